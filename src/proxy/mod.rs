//! Typed wrappers around boundary-side objects.
//!
//! Every proxy owns exactly one [`ObjectRef`] and forwards each of its
//! operations through the [`Dispatcher`] that produced the reference. Proxies
//! are only ever created from a dispatch result; host code cannot build one
//! from a bare reference.

use std::path::PathBuf ;
use std::sync::Arc ;

use crate::config::UnknownOutcomePolicy ;
use crate::dispatch::{ Cause, DispatchError, Dispatcher, ObjectRef, Target };
use crate::value::{ Kind, Value };

/// Declares a proxy type for one boundary-side concept.
macro_rules! proxy {
	( $( #[$meta:meta] )* $name:ident ) => {
		$( #[$meta] )*
		pub struct $name {
			handle: $crate::proxy::Handle,
		}

		impl $crate::proxy::Proxy for $name {
			fn reference( &self ) -> &$crate::dispatch::ObjectRef { self.handle.reference() }
		}

		impl $crate::proxy::Wrap for $name {
			fn wrap( handle: $crate::proxy::Handle ) -> Self { Self { handle }}
		}

		impl std::fmt::Debug for $name {
			fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
				f.debug_tuple( stringify!( $name )).field( self.handle.reference() ).finish()
			}
		}
	};
}

mod context ;
mod environment ;
mod parser ;
mod recipe ;
mod source_file ;
mod styles ;
mod validated ;

pub use context::{ ExecutionContext, ResourceLoader };
pub use environment::{ Environment, EnvironmentBuilder };
pub use parser::{ kind, JavaParser, JavaParserBuilder, Parser, PropertiesParser, XmlParser, YamlParser };
pub use recipe::{ Recipe, RecipeResult };
pub use source_file::SourceFile ;
pub use styles::{ NamedStyles, RecipeDescriptor };
pub use validated::{ Both, Invalid, Validated };



/// A host-visible wrapper around one boundary-side object.
pub trait Proxy {

	/// The wrapped reference.
	fn reference( &self ) -> &ObjectRef ;

	/// The value this proxy is passed as when it is an argument of another call.
	fn to_value( &self ) -> Value { Value::Object( self.reference().clone() ) }

}

/// Builds a proxy around a dispatch result.
pub(crate) trait Wrap: Sized {
	fn wrap( handle: Handle ) -> Self ;
}

/// The reference a proxy owns, together with everything needed to call
/// operations on it.
pub(crate) struct Handle {
	dispatcher: Arc<Dispatcher>,
	policy: UnknownOutcomePolicy,
	reference: ObjectRef,
}

impl Handle {

	#[inline] pub fn reference( &self ) -> &ObjectRef { &self.reference }
	#[inline] pub fn policy( &self ) -> UnknownOutcomePolicy { self.policy }

	/// Calls `operation` on the wrapped object.
	pub fn invoke( &self, operation: &str, shape: &[Kind], args: Vec<Value> ) -> Result<Returned, DispatchError> {
		let target = Target::Method( &self.reference, operation );
		let value = self.dispatcher.invoke( target, shape, args )?;
		Ok( Returned::new( Arc::clone( &self.dispatcher ), self.policy, target.to_string(), value ))
	}

}

impl std::fmt::Debug for Handle {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_tuple( "Handle" ).field( &self.reference ).finish()
	}
}

/// The raw result of one dispatch, waiting to be given its typed meaning.
pub(crate) struct Returned {
	dispatcher: Arc<Dispatcher>,
	policy: UnknownOutcomePolicy,
	operation: String,
	value: Value,
}

impl Returned {

	pub fn new( dispatcher: Arc<Dispatcher>, policy: UnknownOutcomePolicy, operation: String, value: Value ) -> Self {
		Self { dispatcher, policy, operation, value }
	}

	/// Drops the value. Used by builder steps that return the builder itself.
	pub fn ignore( self ) {}

	pub fn into_string( self ) -> Result<String, DispatchError> {
		match self.value {
			Value::String( value ) => Ok( value ),
			other => Err( unexpected( self.operation, "string", &other )),
		}
	}

	pub fn into_optional_string( self ) -> Result<Option<String>, DispatchError> {
		match self.value {
			Value::Option( None ) => Ok( None ),
			Value::Option( Some( value )) => match *value {
				Value::String( value ) => Ok( Some( value )),
				other => Err( unexpected( self.operation, "optional string", &other )),
			},
			other => Err( unexpected( self.operation, "optional string", &other )),
		}
	}

	pub fn into_path( self ) -> Result<PathBuf, DispatchError> {
		self.into_string().map( PathBuf::from )
	}

	pub fn into_proxy<P: Wrap>( self ) -> Result<P, DispatchError> {
		let Self { dispatcher, policy, operation, value } = self ;
		match value {
			Value::Object( reference ) => Ok( P::wrap( Handle { dispatcher, policy, reference })),
			other => Err( unexpected( operation, "object", &other )),
		}
	}

	/// An absent value maps to `None`, never to a proxy.
	pub fn into_optional<P: Wrap>( self ) -> Result<Option<P>, DispatchError> {
		let Self { dispatcher, policy, operation, value } = self ;
		match value {
			Value::Option( None ) => Ok( None ),
			Value::Option( Some( value )) => match *value {
				Value::Object( reference ) => Ok( Some( P::wrap( Handle { dispatcher, policy, reference }))),
				other => Err( unexpected( operation, "optional object", &other )),
			},
			other => Err( unexpected( operation, "optional object", &other )),
		}
	}

	/// Every element of a returned list as a handle, in the order returned.
	pub fn into_handles( self ) -> Result<Vec<Handle>, DispatchError> {
		let Self { dispatcher, policy, operation, value } = self ;
		let items = match value {
			Value::List( items ) => items,
			other => return Err( unexpected( operation, "list of objects", &other )),
		};
		items.into_iter()
			.map(| item | match item {
				Value::Object( reference ) => Ok( Handle { dispatcher: Arc::clone( &dispatcher ), policy, reference }),
				other => Err( unexpected( operation.clone(), "object", &other )),
			})
			.collect()
	}

	pub fn into_proxies<P: Wrap>( self ) -> Result<Vec<P>, DispatchError> {
		Ok( self.into_handles()?.into_iter().map( P::wrap ).collect() )
	}

	/// Every element of a returned list as a handle, together with the case
	/// tag of the variant wrapping it. Bare objects carry no tag.
	pub fn into_tagged_handles( self ) -> Result<Vec<( Option<String>, Handle )>, DispatchError> {
		let Self { dispatcher, policy, operation, value } = self ;
		let items = match value {
			Value::List( items ) => items,
			other => return Err( unexpected( operation, "list of objects", &other )),
		};
		let handle = | reference | Handle { dispatcher: Arc::clone( &dispatcher ), policy, reference };
		items.into_iter()
			.map(| item | match item {
				Value::Object( reference ) => Ok(( None, handle( reference ))),
				Value::Variant( tag, Some( payload )) => match *payload {
					Value::Object( reference ) => Ok(( Some( tag ), handle( reference ))),
					other => Err( unexpected( operation.clone(), "object", &other )),
				},
				other => Err( unexpected( operation.clone(), "object or variant of object", &other )),
			})
			.collect()
	}

}

fn unexpected( operation: String, expected: &'static str, found: &Value ) -> DispatchError {
	DispatchError::new( operation, Cause::UnexpectedValue { expected, found: found.describe() })
}

/// Arguments for an operation taking a list of proxies.
pub(crate) fn proxy_list<'a, P: Proxy + 'a>( proxies: impl IntoIterator<Item = &'a P> ) -> Value {
	Value::List( proxies.into_iter().map( Proxy::to_value ).collect() )
}

/// Arguments for an operation taking a list of paths.
pub(crate) fn path_list<'a>( paths: impl IntoIterator<Item = &'a PathBuf> ) -> Value {
	Value::List( paths.into_iter().map(| path | Value::String( path.to_string_lossy().into_owned() )).collect() )
}
