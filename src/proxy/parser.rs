use std::marker::PhantomData ;
use std::path::{ Path, PathBuf };

use crate::dispatch::{ DispatchError, ObjectRef };
use crate::value::{ Kind, Value };
use super::{ path_list, proxy_list, ExecutionContext, Handle, NamedStyles, Proxy, SourceFile, Wrap };

/// The source languages a [`Parser`] can be for.
pub mod kind {

	/// A source language with its own boundary-side parser.
	pub trait ParserKind {
		/// Human-readable language name.
		const LANGUAGE: &'static str ;
	}

	macro_rules! parser_kind {
		( $( $name:ident => $language:literal ),* $(,)? ) => { $(
			#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
			pub enum $name {}
			impl ParserKind for $name { const LANGUAGE: &'static str = $language ; }
		)* };
	}

	parser_kind!{
		Java => "java",
		Yaml => "yaml",
		Xml => "xml",
		Properties => "properties",
	}

}

use kind::ParserKind ;

/// Parses source files of one language.
///
/// All parsers share the same shape; the type parameter only keeps parsers of
/// different languages from being mixed up.
pub struct Parser<K: ParserKind> {
	handle: Handle,
	kind: PhantomData<fn() -> K>,
}

pub type JavaParser = Parser<kind::Java> ;
pub type YamlParser = Parser<kind::Yaml> ;
pub type XmlParser = Parser<kind::Xml> ;
pub type PropertiesParser = Parser<kind::Properties> ;

impl<K: ParserKind> Parser<K> {

	/// Parses `sources`, resolving relative paths against `base_dir`. The parsed
	/// files come back in the order the boundary produced them.
	pub fn parse( &self, sources: &[PathBuf], base_dir: &Path, context: &ExecutionContext ) -> Result<Vec<SourceFile>, DispatchError> {
		self.handle.invoke(
			"parse",
			&[ Kind::List, Kind::String, Kind::Object ],
			vec![ path_list( sources ), Value::String( base_dir.to_string_lossy().into_owned() ), context.to_value() ],
		)?.into_proxies()
	}

}

impl<K: ParserKind> Proxy for Parser<K> {
	fn reference( &self ) -> &ObjectRef { self.handle.reference() }
}

impl<K: ParserKind> Wrap for Parser<K> {
	fn wrap( handle: Handle ) -> Self { Self { handle, kind: PhantomData }}
}

impl<K: ParserKind> std::fmt::Debug for Parser<K> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Parser" )
			.field( "language", &K::LANGUAGE )
			.field( "reference", self.handle.reference() )
			.finish()
	}
}

proxy!{
	/// Configures a [`JavaParser`] before it is built.
	JavaParserBuilder
}

impl JavaParserBuilder {

	pub fn styles( self, styles: &[NamedStyles] ) -> Result<Self, DispatchError> {
		self.handle.invoke( "styles", &[ Kind::List ], vec![ proxy_list( styles )])?.ignore();
		Ok( self )
	}

	pub fn classpath( self, classpath: &[PathBuf] ) -> Result<Self, DispatchError> {
		self.handle.invoke( "classpath", &[ Kind::List ], vec![ path_list( classpath )])?.ignore();
		Ok( self )
	}

	pub fn log_compilation_warnings_and_errors( self, enabled: bool ) -> Result<Self, DispatchError> {
		self.handle.invoke( "log-compilation-warnings-and-errors", &[ Kind::Bool ], vec![ Value::Bool( enabled )])?.ignore();
		Ok( self )
	}

	pub fn build( self ) -> Result<JavaParser, DispatchError> {
		self.handle.invoke( "build", &[], vec![] )?.into_proxy()
	}

}
