//! The isolated loading boundary, backed by wasmtime components.
//!
//! Every resolved artifact is a WebAssembly component. All of them are
//! instantiated into one [`Store`] through a [`Linker`] that defines nothing
//! from the host apart from the error callback bridge, so boundary-side code
//! can neither see nor collide with anything the host has loaded.
//!
//! Concept names are fully qualified as `namespace:package/interface#resource`.
//! A name without a `#resource` part refers to an interface of free functions.
//! Calls are mapped onto component-model export names:
//!
//! - constructor of `…#r` → `[constructor]r`
//! - static `op` of `…#r` → `[static]r.op`
//! - method `op` on an object whose runtime type is `…#r` → `[method]r.op`
//! - `op` of an interface concept → `op`
//!
//! Objects are only ever lent to the boundary. An operation whose parameters
//! contain an `own<…>` handle is rejected before the call, so every reference
//! the host holds stays valid for as long as the boundary lives.

use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use itertools::Itertools ;
use pipe_trait::Pipe ;
use thiserror::Error ;
use tracing::{ debug, warn };
use wasmtime::{ Engine, Store, StoreContextMut };
use wasmtime::component::{ Component, Func, Instance, Linker, ResourceAny, ResourceType, Val };
use wasmtime::component::types::{ ComponentItem, Type };

use crate::{ CoordinateError, RequirementError, ResolveError };
use crate::dispatch::{ Boundary, BoundaryFailure, BoundaryId, CallbackId, Cause, ConceptHandle, ErrorCallback, ObjectRef, Target };
use crate::object_table::ObjectTable ;
use crate::value::Value ;



/// Interface through which boundary-side code reports non-fatal errors.
pub const HOST_CALLBACKS: &str = "openrewrite:host/callbacks" ;
/// `on-error: func( callback: u32, message: string )`
pub const ON_ERROR: &str = "on-error" ;

/// Runtime type reported for resources no loaded component exports.
const UNKNOWN_TYPE: &str = "<unknown>" ;

/// Errors that prevent a boundary from being constructed. Always fatal for the
/// task that needed the boundary.
#[derive( Debug, Error )]
pub enum BoundaryError {
	/// The configured modules do not form valid coordinates.
	#[error( "Invalid module coordinate: {0}" )] Coordinate( #[from] CoordinateError ),
	/// The requirement set could not be declared.
	#[error( "Requirement set error: {0}" )] Requirements( #[from] RequirementError ),
	/// A module could not be materialised into an artifact.
	#[error( "Failed to resolve boundary modules: {0}" )] Resolve( #[from] ResolveError ),
	/// The host callback bridge could not be defined.
	#[error( "Failed to link host callbacks: {0}" )] Link( wasmtime::Error ),
	/// An artifact is not a valid component.
	#[error( "Failed to compile {}: {error}", artifact.display() )]
	Compile { artifact: PathBuf, error: wasmtime::Error },
	/// An artifact could not be instantiated, typically because it imports
	/// something the boundary does not provide.
	#[error( "Failed to instantiate {}: {error}", artifact.display() )]
	Instantiate { artifact: PathBuf, error: wasmtime::Error },
}

/// Builds a boundary from a set of resolved artifacts.
pub trait BoundaryFactory: Send + Sync {
	/// Loads every artifact into a fresh boundary.
	///
	/// # Errors
	/// Fails if any artifact cannot be loaded.
	fn create( &self, artifacts: &[PathBuf] ) -> Result<Box<dyn Boundary>, BoundaryError> ;
}

/// Creates a [`WasmBoundary`] per call, all sharing one engine.
#[derive( Clone, Default )]
pub struct WasmBoundaryFactory {
	engine: Engine,
}

impl WasmBoundaryFactory {
	pub fn new( engine: Engine ) -> Self { Self { engine }}
	#[inline] pub fn engine( &self ) -> &Engine { &self.engine }
}

impl BoundaryFactory for WasmBoundaryFactory {
	fn create( &self, artifacts: &[PathBuf] ) -> Result<Box<dyn Boundary>, BoundaryError> {
		Ok( Box::new( WasmBoundary::load( &self.engine, artifacts )? ))
	}
}

/// Data held in the boundary's store.
#[derive( Default )]
pub struct BoundaryContext {
	objects: ObjectTable,
	callbacks: Vec<ErrorCallback>,
}

impl BoundaryContext {
	fn notify( &mut self, callback: u32, message: String ) {
		match usize::try_from( callback ).ok().and_then(| index | self.callbacks.get_mut( index )) {
			Some( callback ) => callback( BoundaryFailure::new( message )),
			None => warn!( callback, %message, "Boundary reported an error to an unregistered callback" ),
		}
	}
}

struct LoadedArtifact {
	path: PathBuf,
	instance: Instance,
}

/// A loading boundary holding one instance per artifact.
pub struct WasmBoundary {
	id: BoundaryId,
	store: Store<BoundaryContext>,
	artifacts: Vec<LoadedArtifact>,
	types: Vec<( ResourceType, Arc<str> )>,
}

impl WasmBoundary {

	const PLACEHOLDER_VAL: Val = Val::Tuple( vec![] );

	/// Compiles and instantiates every artifact, in order.
	///
	/// # Errors
	/// Fails if an artifact cannot be compiled or instantiated.
	pub fn load( engine: &Engine, artifacts: &[PathBuf] ) -> Result<Self, BoundaryError> {
		artifacts.iter()
			.map(| path | Component::from_file( engine, path )
				.map(| component | ( path.clone(), component ))
				.map_err(| error | BoundaryError::Compile { artifact: path.clone(), error })
			)
			.collect::<Result<Vec<_>, _>>()?
			.pipe(| components | Self::from_components( engine, components ))
	}

	/// Instantiates already compiled components. The paths are only used for
	/// diagnostics.
	///
	/// # Errors
	/// Fails if a component cannot be instantiated.
	pub fn from_components(
		engine: &Engine,
		components: impl IntoIterator<Item = ( PathBuf, Component )>,
	) -> Result<Self, BoundaryError> {

		let linker = host_linker( engine )?;
		let mut store = Store::new( engine, BoundaryContext::default() );
		let mut artifacts = Vec::new();
		let mut types = Vec::new();

		for ( path, component ) in components {
			let instance = linker.instantiate( &mut store, &component )
				.map_err(| error | BoundaryError::Instantiate { artifact: path.clone(), error })?;
			types.extend( exported_resource_types( engine, &component, &instance, &mut store ));
			artifacts.push( LoadedArtifact { path, instance });
		}

		let id = BoundaryId::fresh();
		debug!(
			boundary = %id,
			artifacts = %artifacts.iter().map(| artifact | artifact.path.display() ).join( ", " ),
			types = %types.iter().map(|( _, name )| name ).join( ", " ),
			"Constructed loading boundary",
		);
		Ok( Self { id, store, artifacts, types })

	}

	/// Paths of the artifacts loaded into this boundary.
	pub fn artifacts( &self ) -> impl Iterator<Item = &Path> {
		self.artifacts.iter().map(| artifact | artifact.path.as_path() )
	}

	fn find_function( &mut self, interface: &str, function: &str ) -> Option<Func> {
		let Self { store, artifacts, .. } = self ;
		artifacts.iter().find_map(| artifact | {
			let interface_index = artifact.instance.get_export_index( &mut *store, None, interface )?;
			let function_index = artifact.instance.get_export_index( &mut *store, Some( &interface_index ), function )?;
			artifact.instance.get_func( &mut *store, function_index )
		})
	}

	fn runtime_type( &self, handle: &ResourceAny ) -> Arc<str> {
		let ty = handle.ty();
		self.types.iter()
			.find(|( known, _ )| *known == ty )
			.map_or_else(|| Arc::from( UNKNOWN_TYPE ), |( _, name )| Arc::clone( name ))
	}

	fn lower( &self, value: Value ) -> Result<Val, Cause> {
		Ok( match value {
			Value::Unit => Val::Tuple( Vec::new() ),
			Value::Bool( value ) => Val::Bool( value ),
			Value::Integer( value ) => Val::S64( value ),
			Value::String( value ) => Val::String( value ),
			Value::Bytes( bytes ) => Val::List( bytes.into_iter().map( Val::U8 ).collect() ),
			Value::List( items ) => Val::List( self.lower_all( items )? ),
			Value::Tuple( items ) => Val::Tuple( self.lower_all( items )? ),
			Value::Record( fields ) => Val::Record( fields.into_iter()
				.map(|( name, item )| Ok::<_, Cause>(( name, self.lower( item )? )))
				.collect::<Result<_, _>>()?
			),
			Value::Option( item ) => Val::Option( item.map(| item | self.lower( *item ).map( Box::new )).transpose()? ),
			Value::Variant( tag, payload ) => Val::Variant( tag, payload.map(| item | self.lower( *item ).map( Box::new )).transpose()? ),
			Value::Object( object ) => Val::Resource( self.store.data().objects.lookup( &object )? ),
			Value::Callback( CallbackId( id )) => Val::U32( id ),
		})
	}

	fn lower_all( &self, items: Vec<Value> ) -> Result<Vec<Val>, Cause> {
		items.into_iter().map(| item | self.lower( item )).collect()
	}

	fn lift( &mut self, val: Val ) -> Result<Value, Cause> {
		Ok( match val {
			Val::Bool( value ) => Value::Bool( value ),
			Val::S8( value ) => Value::Integer( value.into() ),
			Val::S16( value ) => Value::Integer( value.into() ),
			Val::S32( value ) => Value::Integer( value.into() ),
			Val::S64( value ) => Value::Integer( value ),
			Val::U8( value ) => Value::Integer( value.into() ),
			Val::U16( value ) => Value::Integer( value.into() ),
			Val::U32( value ) => Value::Integer( value.into() ),
			Val::U64( value ) => Value::Integer( i64::try_from( value )
				.map_err(|_| Cause::UnsupportedType( format!( "u64 {} exceeds i64", value )))? ),
			Val::Char( value ) => Value::String( value.to_string() ),
			Val::String( value ) => Value::String( value ),
			Val::List( items ) => Value::List( self.lift_all( items )? ),
			Val::Tuple( items ) if items.is_empty() => Value::Unit,
			Val::Tuple( items ) => Value::Tuple( self.lift_all( items )? ),
			Val::Record( fields ) => Value::Record( fields.into_iter()
				.map(|( name, item )| Ok::<_, Cause>(( name, self.lift( item )? )))
				.collect::<Result<_, _>>()?
			),
			Val::Variant( tag, payload ) => Value::Variant( tag, self.lift_boxed( payload )? ),
			Val::Enum( tag ) => Value::Variant( tag, None ),
			Val::Flags( flags ) => Value::List( flags.into_iter().map( Value::String ).collect() ),
			Val::Option( item ) => Value::Option( self.lift_boxed( item )? ),
			Val::Result( Ok( payload )) => Value::Variant( "ok".to_string(), self.lift_boxed( payload )? ),
			Val::Result( Err( payload )) => Value::Variant( "err".to_string(), self.lift_boxed( payload )? ),
			Val::Resource( handle ) => {
				let slot = self.store.data_mut().objects.attach( handle )?;
				Value::Object( ObjectRef::new( self.id, slot, self.runtime_type( &handle )))
			},
			Val::Float32( _ ) | Val::Float64( _ ) => return Err( Cause::UnsupportedType( "float".to_string() )),
			Val::Future( _ ) => return Err( Cause::UnsupportedType( "future".to_string() )),
			Val::Stream( _ ) => return Err( Cause::UnsupportedType( "stream".to_string() )),
			Val::ErrorContext( _ ) => return Err( Cause::UnsupportedType( "error-context".to_string() )),
		})
	}

	fn lift_all( &mut self, items: Vec<Val> ) -> Result<Vec<Value>, Cause> {
		items.into_iter().map(| item | self.lift( item )).collect()
	}

	fn lift_boxed( &mut self, item: Option<Box<Val>> ) -> Result<Option<Box<Value>>, Cause> {
		item.map(| item | self.lift( *item ).map( Box::new )).transpose()
	}

	/// Lifts a call's return value. A top-level `result` is unwrapped; its
	/// error arm is a boundary-side exception.
	fn lift_return( &mut self, val: Option<Val> ) -> Result<Value, Cause> {
		match val {
			None | Some( Val::Result( Ok( None ))) => Ok( Value::Unit ),
			Some( Val::Result( Ok( Some( payload )))) => self.lift( *payload ),
			Some( Val::Result( Err( payload ))) => Err( Cause::Raised( BoundaryFailure::new( match payload.as_deref() {
				Some( Val::String( message )) => message.clone(),
				Some( other ) => format!( "{:?}", other ),
				None => "boundary-side error".to_string(),
			}))),
			Some( val ) => self.lift( val ),
		}
	}

}

impl Boundary for WasmBoundary {

	fn id( &self ) -> BoundaryId { self.id }

	fn load_concept( &mut self, name: &str ) -> Result<ConceptHandle, Cause> {
		let ( interface, resource ) = split_type_name( name );
		let Self { store, artifacts, .. } = self ;
		let defined = artifacts.iter().any(| artifact | artifact.instance
			.get_export_index( &mut *store, None, interface )
			.is_some_and(| index | resource.is_none_or(| resource | artifact.instance
				.get_export_index( &mut *store, Some( &index ), resource )
				.is_some()
			))
		);
		match defined {
			true => Ok( ConceptHandle::new( self.id, name )),
			false => Err( Cause::UnknownConcept( name.to_string() )),
		}
	}

	fn call( &mut self, target: Target<'_>, args: Vec<Value> ) -> Result<Value, Cause> {

		let ( interface, function ) = export_name( target )?;
		let func = self.find_function( interface, &function ).ok_or_else(|| Cause::UnknownOperation {
			type_name: interface.to_string(),
			operation: function.clone(),
		})?;

		let ty = func.ty( &self.store );
		if let Some(( parameter, _ )) = ty.params().find(|( _, param )| takes_ownership( param )) {
			return Err( Cause::OwnedParameter { parameter: parameter.to_string() });
		}

		let mut params = Vec::with_capacity( args.len() + 1 );
		if let Target::Method( object, _ ) = target {
			params.push( Val::Resource( self.store.data().objects.lookup( object )? ));
		}
		for arg in args { params.push( self.lower( arg )? ); }

		let mut results = vec![ Self::PLACEHOLDER_VAL; ty.results().len() ];
		func.call( &mut self.store, &params, &mut results ).map_err( Cause::Trap )?;
		let _ = func.post_return( &mut self.store );

		self.lift_return( results.pop() )

	}

	fn register_callback( &mut self, callback: ErrorCallback ) -> CallbackId {
		let callbacks = &mut self.store.data_mut().callbacks ;
		callbacks.push( callback );
		CallbackId( u32::try_from( callbacks.len() - 1 ).unwrap_or( u32::MAX ))
	}

}

impl std::fmt::Debug for WasmBoundary {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "WasmBoundary" )
			.field( "id", &self.id )
			.field( "artifacts", &self.artifacts().collect::<Vec<_>>() )
			.field( "types", &self.types.iter().map(|( _, name )| name ).collect::<Vec<_>>() )
			.finish_non_exhaustive()
	}
}

/// A linker whose only host definition is the error callback bridge.
fn host_linker( engine: &Engine ) -> Result<Linker<BoundaryContext>, BoundaryError> {
	let mut linker = Linker::new( engine );
	{
		let mut root = linker.root();
		let mut callbacks = root.instance( HOST_CALLBACKS ).map_err( BoundaryError::Link )?;
		callbacks.func_wrap( ON_ERROR, | mut ctx: StoreContextMut<'_, BoundaryContext>, ( callback, message ): ( u32, String ) | {
			ctx.data_mut().notify( callback, message );
			Ok(())
		}).map_err( BoundaryError::Link )?;
	}
	Ok( linker )
}

/// Every resource type the component exports, keyed by its runtime type.
fn exported_resource_types(
	engine: &Engine,
	component: &Component,
	instance: &Instance,
	store: &mut Store<BoundaryContext>,
) -> Vec<( ResourceType, Arc<str> )> {

	let component_type = component.component_type();
	let declared = component_type.exports( engine )
		.filter_map(|( interface, item )| match item {
			ComponentItem::ComponentInstance( interface_type ) => Some( interface_type.exports( engine )
				.filter(|( _, item )| matches!( item, ComponentItem::Resource( _ )))
				.map(|( resource, _ )| ( interface.to_string(), resource.to_string() ))
				.collect_vec()
			),
			_ => None,
		})
		.flatten()
		.collect_vec();

	declared.into_iter()
		.filter_map(|( interface, resource )| {
			let interface_index = instance.get_export_index( &mut *store, None, &interface )?;
			let resource_index = instance.get_export_index( &mut *store, Some( &interface_index ), &resource )?;
			let ty = instance.get_resource( &mut *store, resource_index )?;
			Some(( ty, Arc::from( format!( "{}#{}", interface, resource ))))
		})
		.collect()

}

/// Whether passing a value of type `ty` would hand a resource over to the callee.
fn takes_ownership( ty: &Type ) -> bool {
	match ty {
		Type::Own( _ ) => true,
		Type::List( list ) => takes_ownership( &list.ty() ),
		Type::Option( option ) => takes_ownership( &option.ty() ),
		Type::Tuple( tuple ) => tuple.types().any(| item | takes_ownership( &item )),
		Type::Record( record ) => record.fields().any(| field | takes_ownership( &field.ty )),
		Type::Variant( variant ) => variant.cases().any(| case | case.ty.as_ref().is_some_and( takes_ownership )),
		Type::Result( result ) => result.ok().iter().chain( result.err().iter() ).any( takes_ownership ),
		_ => false,
	}
}

fn split_type_name( name: &str ) -> ( &str, Option<&str> ) {
	match name.split_once( '#' ) {
		Some(( interface, resource )) => ( interface, Some( resource )),
		None => ( name, None ),
	}
}

/// The interface and export name a call resolves to.
fn export_name( target: Target<'_> ) -> Result<( &str, String ), Cause> {
	let type_name = match target {
		Target::Constructor( concept ) | Target::Static( concept, _ ) => concept.name(),
		Target::Method( object, _ ) => object.type_name(),
	};
	let ( interface, resource ) = split_type_name( type_name );
	let function = match ( target, resource ) {
		( Target::Constructor( _ ), Some( resource )) => format!( "[constructor]{}", resource ),
		( Target::Static( _, operation ), Some( resource )) => format!( "[static]{}.{}", resource, operation ),
		( Target::Static( _, operation ), None ) => operation.to_string(),
		( Target::Method( _, operation ), Some( resource )) => format!( "[method]{}.{}", resource, operation ),
		( Target::Constructor( _ ), None ) | ( Target::Method( _, _ ), None ) => return Err( Cause::UnknownOperation {
			type_name: type_name.to_string(),
			operation: target.to_string(),
		}),
	};
	Ok(( interface, function ))
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn maps_targets_onto_export_names() {
		let boundary = BoundaryId::fresh();
		let concept = ConceptHandle::new( boundary, "openrewrite:core/config#environment" );
		let interface = ConceptHandle::new( boundary, "openrewrite:core/util" );
		let object = ObjectRef::new( boundary, 0, "openrewrite:core/recipe#recipe" );

		assert_eq!( export_name( Target::Constructor( &concept )).unwrap(), ( "openrewrite:core/config", "[constructor]environment".to_string() ));
		assert_eq!( export_name( Target::Static( &concept, "builder" )).unwrap(), ( "openrewrite:core/config", "[static]environment.builder".to_string() ));
		assert_eq!( export_name( Target::Static( &interface, "version" )).unwrap(), ( "openrewrite:core/util", "version".to_string() ));
		assert_eq!( export_name( Target::Method( &object, "get-name" )).unwrap(), ( "openrewrite:core/recipe", "[method]recipe.get-name".to_string() ));
		assert!( matches!( export_name( Target::Constructor( &interface )), Err( Cause::UnknownOperation { .. })));
	}
}
