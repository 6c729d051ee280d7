//! Late-bound operation dispatch.
//!
//! A [`Boundary`] owns boundary-side objects and knows how to call operations on
//! them by name. The [`Dispatcher`] sits in front of a boundary and is the only
//! way the proxy layer reaches it: it validates each call against the expected
//! argument shape, makes sure no reference crosses into a boundary it does not
//! belong to, and folds every failure into a single [`DispatchError`].

use std::sync::{ Arc, Mutex };
use std::sync::atomic::{ AtomicU64, Ordering };
use itertools::Itertools ;
use thiserror::Error ;
use tracing::{ debug, trace };

use crate::value::{ Kind, Value };



/// Process-unique identity of one loading boundary.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct BoundaryId( u64 );

impl BoundaryId {
	/// Allocates an id no other boundary in this process has.
	pub fn fresh() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new( 1 );
		Self( NEXT.fetch_add( 1, Ordering::Relaxed ))
	}
}

impl std::fmt::Display for BoundaryId {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "boundary-{}", self.0 )}
}

/// An opaque reference to a boundary-side object.
///
/// Only meaningful inside the boundary that produced it. The `type_name` is the
/// object's runtime type as reported by the boundary; methods are looked up on it.
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
pub struct ObjectRef {
	boundary: BoundaryId,
	slot: u32,
	type_name: Arc<str>,
}

impl ObjectRef {
	pub fn new( boundary: BoundaryId, slot: u32, type_name: impl Into<Arc<str>> ) -> Self {
		Self { boundary, slot, type_name: type_name.into() }
	}
	#[inline] pub fn boundary( &self ) -> BoundaryId { self.boundary }
	#[inline] pub fn slot( &self ) -> u32 { self.slot }
	#[inline] pub fn type_name( &self ) -> &str { &self.type_name }
}

/// A loaded boundary-side concept (type or interface) that can be constructed
/// or have its static operations called.
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
pub struct ConceptHandle {
	boundary: BoundaryId,
	name: Arc<str>,
}

impl ConceptHandle {
	pub fn new( boundary: BoundaryId, name: impl Into<Arc<str>> ) -> Self {
		Self { boundary, name: name.into() }
	}
	#[inline] pub fn boundary( &self ) -> BoundaryId { self.boundary }
	#[inline] pub fn name( &self ) -> &str { &self.name }
}

/// Identifies a host callback registered with a boundary.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct CallbackId( pub u32 );

/// A non-fatal error reported by boundary-side code, or the payload of a
/// boundary-side exception.
#[derive( Debug, Clone, PartialEq, Eq, Error )]
#[error( "{message}" )]
pub struct BoundaryFailure {
	message: String,
}

impl BoundaryFailure {
	pub fn new( message: impl Into<String> ) -> Self { Self { message: message.into() }}
	#[inline] pub fn message( &self ) -> &str { &self.message }
}

/// Host-supplied consumer of per-item boundary-side errors.
pub type ErrorCallback = Box<dyn FnMut( BoundaryFailure ) + Send> ;

/// The receiver and kind of one late-bound call.
#[derive( Debug, Clone, Copy )]
pub enum Target<'a> {
	/// Instantiate the concept.
	Constructor( &'a ConceptHandle ),
	/// Call an operation that needs no receiver object.
	Static( &'a ConceptHandle, &'a str ),
	/// Call an operation on a boundary-side object.
	Method( &'a ObjectRef, &'a str ),
}

impl Target<'_> {
	fn boundary( &self ) -> BoundaryId {
		match self {
			Self::Constructor( concept ) | Self::Static( concept, _ ) => concept.boundary(),
			Self::Method( object, _ ) => object.boundary(),
		}
	}
}

impl std::fmt::Display for Target<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match self {
			Self::Constructor( concept ) => write!( f, "{}::new", concept.name() ),
			Self::Static( concept, operation ) => write!( f, "{}::{}", concept.name(), operation ),
			Self::Method( object, operation ) => write!( f, "{}.{}", object.type_name(), operation ),
		}
	}
}

/// An isolated environment holding boundary-side objects.
///
/// Implementations perform the actual lookup and invocation. They do not need to
/// validate argument shapes or reference ownership; the [`Dispatcher`] does that
/// before every call.
pub trait Boundary: Send {

	/// Identity stamped on every reference this boundary hands out.
	fn id( &self ) -> BoundaryId ;

	/// Resolves a fully-qualified concept name.
	///
	/// # Errors
	/// [`Cause::UnknownConcept`] if nothing in the boundary defines the concept.
	fn load_concept( &mut self, name: &str ) -> Result<ConceptHandle, Cause> ;

	/// Looks up the operation on the target's runtime type and invokes it.
	///
	/// # Errors
	/// Any lookup or invocation failure.
	fn call( &mut self, target: Target<'_>, args: Vec<Value> ) -> Result<Value, Cause> ;

	/// Makes `callback` reachable from boundary-side code through the returned id.
	fn register_callback( &mut self, callback: ErrorCallback ) -> CallbackId ;

}

/// The reason a dispatch failed.
#[derive( Debug, Error )]
pub enum Cause {
	/// Failed to acquire the boundary lock (a previous call panicked).
	#[error( "Lock Rejected" )] LockRejected,
	/// No concept with this fully-qualified name exists in the boundary.
	#[error( "Unknown concept `{0}`" )] UnknownConcept( String ),
	/// The receiver's runtime type has no operation with this name.
	#[error( "`{type_name}` has no operation `{operation}`" )]
	UnknownOperation { type_name: String, operation: String },
	/// The arguments don't match the operation's expected shape.
	#[error( "Expected arguments ({}), found ({})", expected.iter().join( ", " ), found.iter().join( ", " ))]
	ArgumentShape { expected: Vec<Kind>, found: Vec<Kind> },
	/// A reference produced by another boundary was passed to this one.
	#[error( "Reference to `{type_name}` belongs to {owner}, not {boundary}" )]
	ForeignReference { type_name: String, owner: BoundaryId, boundary: BoundaryId },
	/// A parameter would take ownership of a boundary-side object away from the
	/// host. Objects can only be lent to boundary-side operations.
	#[error( "Parameter `{parameter}` takes ownership of a boundary-side object, only borrowed objects can be passed" )]
	OwnedParameter { parameter: String },
	/// The reference no longer points at a live object.
	#[error( "Stale reference to `{type_name}` (slot {slot})" )]
	StaleReference { type_name: String, slot: u32 },
	/// The boundary returned something other than what the operation promises.
	#[error( "Expected {expected}, found {found}" )]
	UnexpectedValue { expected: &'static str, found: String },
	/// Boundary-side code raised an exception.
	#[error( "Boundary-side exception: {0}" )] Raised( #[source] BoundaryFailure ),
	/// Boundary-side code trapped or the call could not be performed.
	#[error( "Runtime Exception: {0}" )] Trap( wasmtime::Error ),
	/// The value has no host-side rendition.
	#[error( "Unsupported type: {0}" )] UnsupportedType( String ),
	/// The boundary cannot hold any more objects.
	#[error( "Object Table Full" )] ObjectTableFull,
}

/// The single failure kind of every late-bound operation.
///
/// Carries the operation that failed and the underlying [`Cause`], which is also
/// exposed through [`std::error::Error::source`].
#[derive( Debug, Error )]
#[error( "Dispatch of `{operation}` failed: {cause}" )]
pub struct DispatchError {
	operation: String,
	#[source] cause: Cause,
}

impl DispatchError {
	pub(crate) fn new( operation: impl Into<String>, cause: Cause ) -> Self {
		Self { operation: operation.into(), cause }
	}
	#[inline] pub fn operation( &self ) -> &str { &self.operation }
	#[inline] pub fn cause( &self ) -> &Cause { &self.cause }
	pub fn into_cause( self ) -> Cause { self.cause }
}

/// The single entry point for calls into a boundary.
///
/// Calls are synchronous and serialised; there is no retry and no timeout.
pub struct Dispatcher {
	id: BoundaryId,
	boundary: Mutex<Box<dyn Boundary>>,
}

impl Dispatcher {

	pub fn new( boundary: Box<dyn Boundary> ) -> Self {
		Self { id: boundary.id(), boundary: Mutex::new( boundary ) }
	}

	#[inline] pub fn id( &self ) -> BoundaryId { self.id }

	/// Resolves a concept by its fully-qualified name.
	///
	/// # Errors
	/// Wraps [`Cause::UnknownConcept`] or a lock failure.
	pub fn load_concept( &self, name: &str ) -> Result<ConceptHandle, DispatchError> {
		let operation = format!( "load {}", name );
		let result = self.boundary.lock()
			.map_err(|_| Cause::LockRejected )
			.and_then(| mut boundary | boundary.load_concept( name ));
		result.map_err(| cause | Self::fail( operation, cause ))
	}

	/// Performs one late-bound call.
	///
	/// `shape` is the argument shape the caller expects the operation to take;
	/// `args` are checked against it before the boundary is touched.
	///
	/// # Errors
	/// Every failure, whatever its origin, as a [`DispatchError`].
	pub fn invoke( &self, target: Target<'_>, shape: &[Kind], args: Vec<Value> ) -> Result<Value, DispatchError> {
		trace!( boundary = %self.id, operation = %target, arguments = args.len(), "Dispatching" );
		self.attempt( target, shape, args ).map_err(| cause | Self::fail( target.to_string(), cause ))
	}

	/// Makes a host callback reachable from boundary-side code.
	///
	/// # Errors
	/// Fails only if the boundary lock is poisoned.
	pub fn register_callback( &self, callback: ErrorCallback ) -> Result<CallbackId, DispatchError> {
		let mut boundary = self.boundary.lock()
			.map_err(|_| Self::fail( "register callback", Cause::LockRejected ))?;
		Ok( boundary.register_callback( callback ))
	}

	fn attempt( &self, target: Target<'_>, shape: &[Kind], args: Vec<Value> ) -> Result<Value, Cause> {

		let found = args.iter().map( Value::kind ).collect::<Vec<_>>();
		if found.as_slice() != shape {
			return Err( Cause::ArgumentShape { expected: shape.to_vec(), found });
		}

		if target.boundary() != self.id {
			return Err( Cause::ForeignReference {
				type_name: target.to_string(),
				owner: target.boundary(),
				boundary: self.id,
			});
		}
		if let Some( foreign ) = args.iter().flat_map( Value::objects ).find(| object | object.boundary() != self.id ) {
			return Err( Cause::ForeignReference {
				type_name: foreign.type_name().to_string(),
				owner: foreign.boundary(),
				boundary: self.id,
			});
		}

		let mut boundary = self.boundary.lock().map_err(|_| Cause::LockRejected )?;
		boundary.call( target, args )

	}

	fn fail( operation: impl Into<String>, cause: Cause ) -> DispatchError {
		let error = DispatchError::new( operation, cause );
		debug!( operation = error.operation(), cause = %error.cause(), "Dispatch failed" );
		error
	}

}

impl std::fmt::Debug for Dispatcher {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Dispatcher" )
			.field( "id", &self.id )
			.finish_non_exhaustive()
	}
}
