//! The host-visible entry point.

use std::collections::BTreeMap ;
use std::io::Read ;
use std::sync::Arc ;
use once_cell::sync::OnceCell ;
use thiserror::Error ;
use tracing::debug ;

use crate::boundary::{ BoundaryError, BoundaryFactory, WasmBoundaryFactory };
use crate::config::PluginConfig ;
use crate::dispatch::{ Boundary, BoundaryFailure, DispatchError, Dispatcher, Target };
use crate::proxy::{ EnvironmentBuilder, ExecutionContext, JavaParser, JavaParserBuilder, PropertiesParser, ResourceLoader, Returned, Wrap, XmlParser, YamlParser };
use crate::task::TaskContext ;
use crate::value::{ Kind, Value };



/// Fully-qualified names of the boundary-side concepts the façade instantiates.
pub mod concepts {
	pub const ENVIRONMENT: &str = "openrewrite:core/config#environment" ;
	pub const YAML_RESOURCE_LOADER: &str = "openrewrite:core/config#yaml-resource-loader" ;
	pub const EXECUTION_CONTEXT: &str = "openrewrite:core/execution#in-memory-execution-context" ;
	/// Java parser for hosts running a legacy (1.8) runtime.
	pub const JAVA_8_PARSER: &str = "openrewrite:java-8/parser#java8-parser" ;
	pub const JAVA_11_PARSER: &str = "openrewrite:java-11/parser#java11-parser" ;
	pub const YAML_PARSER: &str = "openrewrite:yaml/parser#yaml-parser" ;
	pub const XML_PARSER: &str = "openrewrite:xml/parser#xml-parser" ;
	pub const PROPERTIES_PARSER: &str = "openrewrite:properties/parser#properties-parser" ;
	/// Runtime types of bare validation outcomes.
	pub const INVALID: &str = "openrewrite:core/validation#invalid" ;
	pub const BOTH: &str = "openrewrite:core/validation#both" ;
}

/// Host runtime version prefix that selects the legacy Java parser.
const LEGACY_RUNTIME_PREFIX: &str = "1.8" ;

/// Override properties handed to boundary-side constructors.
pub type Properties = BTreeMap<String, String> ;

/// Failures of a façade factory.
#[derive( Debug, Error )]
pub enum FacadeError {
	/// The boundary could not be built. Shared by every factory call of the
	/// façade that hit it.
	#[error( "Failed to construct loading boundary: {0}" )]
	Boundary( #[source] Arc<BoundaryError> ),
	#[error( transparent )]
	Dispatch( #[from] DispatchError ),
	/// The resource loader's input could not be read.
	#[error( "Failed to read resource input: {0}" )]
	Io( #[from] std::io::Error ),
}

/// How a concept is instantiated.
#[derive( Debug, Clone, Copy )]
enum Entry {
	Constructor,
	Static( &'static str ),
}

/// Typed, late-bound access to the rewrite engine for one task.
///
/// Construction does no work. The loading boundary is built the first time a
/// factory is called: the task's private requirement set
/// (`"rewrite" + task name`) is layered on `base_set`, the configured modules
/// are declared on it, and the resolved artifacts are loaded. That happens at
/// most once per façade; a failure is kept and returned by every later call.
pub struct RewriteFacade {
	base_set: String,
	config: PluginConfig,
	task: TaskContext,
	factory: Box<dyn BoundaryFactory>,
	dispatcher: OnceCell<Result<Arc<Dispatcher>, Arc<BoundaryError>>>,
}

impl RewriteFacade {

	pub fn new( base_set: impl Into<String>, config: PluginConfig, task: TaskContext ) -> Self {
		Self {
			base_set: base_set.into(),
			config,
			task,
			factory: Box::new( WasmBoundaryFactory::default() ),
			dispatcher: OnceCell::new(),
		}
	}

	/// Builds the boundary through `factory` instead of a default wasmtime engine.
	pub fn with_boundary_factory( mut self, factory: impl BoundaryFactory + 'static ) -> Self {
		self.factory = Box::new( factory );
		self
	}

	#[inline] pub fn config( &self ) -> &PluginConfig { &self.config }
	#[inline] pub fn task( &self ) -> &TaskContext { &self.task }

	/// Whether a boundary construction has been attempted, successfully or not.
	pub fn is_resolved( &self ) -> bool { self.dispatcher.get().is_some() }

	/// A builder for the recipe and style [`Environment`]( crate::proxy::Environment ).
	///
	/// # Errors
	/// Fails if the boundary cannot be built or the call is rejected.
	pub fn environment_builder( &self, properties: &Properties ) -> Result<EnvironmentBuilder, FacadeError> {
		self.instantiate( concepts::ENVIRONMENT, Entry::Static( "builder" ), &[ Kind::List ], vec![ properties_value( properties )])
	}

	/// A resource loader over a YAML document. `input` is read to the end and
	/// handed over unchanged; `source` names where it came from.
	///
	/// # Errors
	/// Fails if `input` cannot be read, the boundary cannot be built or the
	/// call is rejected.
	pub fn yaml_resource_loader( &self, mut input: impl Read, source: &str, properties: &Properties ) -> Result<ResourceLoader, FacadeError> {
		let mut bytes = Vec::new();
		input.read_to_end( &mut bytes )?;
		self.instantiate(
			concepts::YAML_RESOURCE_LOADER,
			Entry::Constructor,
			&[ Kind::Bytes, Kind::String, Kind::List ],
			vec![ Value::Bytes( bytes ), Value::String( source.to_string() ), properties_value( properties )],
		)
	}

	/// An execution context that hands every non-fatal boundary-side error to `on_error`.
	///
	/// `on_error` runs inside the boundary-side call that reported the error,
	/// while the boundary is locked. It must not call back into any proxy of
	/// this façade; doing so deadlocks.
	///
	/// The callback is registered once the concept is known to exist and stays
	/// registered for the life of the boundary, even if the constructor then fails.
	///
	/// # Errors
	/// Fails if the boundary cannot be built or the call is rejected.
	pub fn execution_context( &self, on_error: impl FnMut( BoundaryFailure ) + Send + 'static ) -> Result<ExecutionContext, FacadeError> {
		let dispatcher = self.dispatcher()?;
		let concept = dispatcher.load_concept( concepts::EXECUTION_CONTEXT )?;
		let callback = dispatcher.register_callback( Box::new( on_error ))?;
		self.construct( dispatcher, Target::Constructor( &concept ), &[ Kind::Callback ], vec![ Value::Callback( callback )])
	}

	/// A builder for the Java parser matching the host runtime.
	///
	/// The runtime version is read on every call; a version starting with
	/// `1.8` selects the legacy parser, anything else the modern one.
	///
	/// # Errors
	/// Fails if the boundary cannot be built or the call is rejected.
	pub fn java_parser_builder( &self ) -> Result<JavaParserBuilder, FacadeError> {
		let version = self.task.host_runtime().version();
		let concept = match version.starts_with( LEGACY_RUNTIME_PREFIX ) {
			true => concepts::JAVA_8_PARSER,
			false => concepts::JAVA_11_PARSER,
		};
		debug!( task = self.task.name(), runtime = %version, concept, "Selected Java parser" );
		self.instantiate( concept, Entry::Static( "builder" ), &[], vec![] )
	}

	/// A Java parser with default settings.
	///
	/// # Errors
	/// Fails if the boundary cannot be built or the call is rejected.
	pub fn java_parser( &self ) -> Result<JavaParser, FacadeError> {
		Ok( self.java_parser_builder()?.build()? )
	}

	/// # Errors
	/// Fails if the boundary cannot be built or the call is rejected.
	pub fn yaml_parser( &self ) -> Result<YamlParser, FacadeError> {
		self.instantiate( concepts::YAML_PARSER, Entry::Constructor, &[], vec![] )
	}

	/// # Errors
	/// Fails if the boundary cannot be built or the call is rejected.
	pub fn xml_parser( &self ) -> Result<XmlParser, FacadeError> {
		self.instantiate( concepts::XML_PARSER, Entry::Constructor, &[], vec![] )
	}

	/// # Errors
	/// Fails if the boundary cannot be built or the call is rejected.
	pub fn properties_parser( &self ) -> Result<PropertiesParser, FacadeError> {
		self.instantiate( concepts::PROPERTIES_PARSER, Entry::Constructor, &[], vec![] )
	}

	fn instantiate<P: Wrap>( &self, concept: &str, entry: Entry, shape: &[Kind], args: Vec<Value> ) -> Result<P, FacadeError> {
		let dispatcher = self.dispatcher()?;
		let concept = dispatcher.load_concept( concept )?;
		let target = match entry {
			Entry::Constructor => Target::Constructor( &concept ),
			Entry::Static( operation ) => Target::Static( &concept, operation ),
		};
		self.construct( dispatcher, target, shape, args )
	}

	fn construct<P: Wrap>( &self, dispatcher: &Arc<Dispatcher>, target: Target<'_>, shape: &[Kind], args: Vec<Value> ) -> Result<P, FacadeError> {
		let value = dispatcher.invoke( target, shape, args )?;
		Ok( Returned::new( Arc::clone( dispatcher ), self.config.unknown_validation_outcome(), target.to_string(), value ).into_proxy()? )
	}

	fn dispatcher( &self ) -> Result<&Arc<Dispatcher>, FacadeError> {
		self.dispatcher
			.get_or_init(|| self.build_boundary()
				.map(| boundary | Arc::new( Dispatcher::new( boundary )))
				.map_err( Arc::new )
			)
			.as_ref()
			.map_err(| err | FacadeError::Boundary( Arc::clone( err )))
	}

	fn build_boundary( &self ) -> Result<Box<dyn Boundary>, BoundaryError> {
		let project = self.task.project();
		let requirements = project.requirements();
		let set = self.task.requirement_set_name();

		requirements.maybe_create( &set )?;
		requirements.extend_from( &set, &self.base_set )?;
		for module in self.config.modules()? { requirements.declare( &set, module )?; }
		let artifacts = requirements.resolve( &set, project.resolver() )?;

		debug!( task = self.task.name(), set = %set, artifacts = artifacts.len(), "Building loading boundary" );
		self.factory.create( &artifacts )
	}

}

impl std::fmt::Debug for RewriteFacade {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "RewriteFacade" )
			.field( "base_set", &self.base_set )
			.field( "config", &self.config )
			.field( "task", &self.task )
			.field( "resolved", &self.is_resolved() )
			.finish_non_exhaustive()
	}
}

fn properties_value( properties: &Properties ) -> Value {
	Value::List( properties.iter()
		.map(|( key, value )| Value::Tuple( vec![ Value::String( key.clone() ), Value::String( value.clone() )]))
		.collect()
	)
}
