//! Named requirement sets owned by the host project.
//!
//! A requirement set is a named list of [`ModuleCoordinate`]s that may be layered
//! on top of other sets. Sets stay mutable until they are resolved; resolving
//! materialises the combined coordinates into artifact files exactly once and
//! freezes the set along with everything it extends.

use std::collections::{ HashMap, HashSet };
use std::path::PathBuf ;
use std::sync::Mutex ;
use itertools::Itertools ;
use thiserror::Error ;
use tracing::debug ;

use crate::ModuleCoordinate ;
use crate::resolver::{ ArtifactResolver, ResolveError };



/// Errors raised while declaring or layering requirement sets.
#[derive( Debug, Error, Clone, PartialEq, Eq )]
pub enum RequirementError {
	/// The named set has never been created.
	#[error( "Unknown requirement set `{0}`" )] UnknownSet( String ),
	/// The set was already resolved and can no longer gain coordinates or parents.
	#[error( "Requirement set `{set}` is already resolved, cannot add `{addition}`" )]
	Frozen { set: String, addition: String },
	/// Layering `child` on `parent` would make a set extend itself.
	#[error( "Requirement set `{child}` cannot extend `{parent}`: cycle detected" )]
	Cycle { child: String, parent: String },
	/// Failed to acquire the registry lock (a previous holder panicked).
	#[error( "Lock Rejected" )] LockRejected,
}

#[derive( Debug, Default )]
struct RequirementSet {
	coordinates: Vec<ModuleCoordinate>,
	parents: Vec<String>,
	frozen: bool,
	resolved: Option<Vec<PathBuf>>,
}

/// The project-level registry of requirement sets.
///
/// Shared between every task of a project. All operations take `&self`; the
/// registry serialises access internally, so two tasks resolving at the same
/// time will see the second one reuse the first one's artifacts.
#[derive( Debug, Default )]
pub struct RequirementRegistry {
	sets: Mutex<HashMap<String, RequirementSet>>,
}

impl RequirementRegistry {

	pub fn new() -> Self { Self::default() }

	/// Creates the named set unless it already exists.
	///
	/// Returns `true` if a new set was created.
	///
	/// # Errors
	/// Fails only if the registry lock is poisoned.
	pub fn maybe_create( &self, name: &str ) -> Result<bool, RequirementError> {
		let mut sets = self.sets.lock().map_err(|_| RequirementError::LockRejected )?;
		if sets.contains_key( name ) { return Ok( false ) }
		sets.insert( name.to_string(), RequirementSet::default() );
		Ok( true )
	}

	/// Returns `true` if the named set exists.
	pub fn contains( &self, name: &str ) -> bool {
		self.sets.lock().is_ok_and(| sets | sets.contains_key( name ))
	}

	/// Declares a coordinate on a set.
	///
	/// Re-declaring a coordinate the set already holds is a no-op, even after
	/// the set was resolved.
	///
	/// # Errors
	/// Fails if the set is unknown, or if it is resolved and the coordinate is new.
	pub fn declare( &self, name: &str, coordinate: ModuleCoordinate ) -> Result<(), RequirementError> {
		let mut sets = self.sets.lock().map_err(|_| RequirementError::LockRejected )?;
		let set = sets.get_mut( name ).ok_or_else(|| RequirementError::UnknownSet( name.to_string() ))?;
		if set.coordinates.contains( &coordinate ) { return Ok(()) }
		if set.frozen {
			return Err( RequirementError::Frozen { set: name.to_string(), addition: coordinate.to_string() });
		}
		set.coordinates.push( coordinate );
		Ok(())
	}

	/// Layers `child` on top of `parent` so that everything declared on the
	/// parent is also required by the child.
	///
	/// # Errors
	/// Fails if either set is unknown, if the child is resolved and the parent
	/// is new to it, or if the layering would create a cycle.
	pub fn extend_from( &self, child: &str, parent: &str ) -> Result<(), RequirementError> {
		let mut sets = self.sets.lock().map_err(|_| RequirementError::LockRejected )?;
		if !sets.contains_key( parent ) { return Err( RequirementError::UnknownSet( parent.to_string() )) }
		if child == parent || ancestors( &sets, parent )?.contains( &child.to_string() ) {
			return Err( RequirementError::Cycle { child: child.to_string(), parent: parent.to_string() });
		}
		let set = sets.get_mut( child ).ok_or_else(|| RequirementError::UnknownSet( child.to_string() ))?;
		if set.parents.iter().any(| existing | existing == parent ) { return Ok(()) }
		if set.frozen {
			return Err( RequirementError::Frozen { set: child.to_string(), addition: parent.to_string() });
		}
		set.parents.push( parent.to_string() );
		Ok(())
	}

	/// The set's own coordinates followed by those of its ancestors, depth-first,
	/// without duplicates.
	///
	/// # Errors
	/// Fails if the set is unknown.
	pub fn coordinates( &self, name: &str ) -> Result<Vec<ModuleCoordinate>, RequirementError> {
		let sets = self.sets.lock().map_err(|_| RequirementError::LockRejected )?;
		collect_coordinates( &sets, name )
	}

	/// Returns `true` once the set, or a set extending it, has been resolved.
	pub fn is_frozen( &self, name: &str ) -> bool {
		self.sets.lock().is_ok_and(| sets | sets.get( name ).is_some_and(| set | set.frozen ))
	}

	/// Returns `true` once the set itself has been resolved.
	pub fn is_resolved( &self, name: &str ) -> bool {
		self.sets.lock().is_ok_and(| sets | sets.get( name ).is_some_and(| set | set.resolved.is_some() ))
	}

	/// Materialises the set into artifact files.
	///
	/// The first successful call asks `resolver` for the artifacts, caches them
	/// and freezes the set and all its ancestors. Every later call returns the
	/// cached artifacts without consulting a resolver. A failed resolution
	/// leaves the registry untouched.
	///
	/// # Errors
	/// Fails if the set is unknown or the resolver cannot materialise every coordinate.
	pub fn resolve( &self, name: &str, resolver: &dyn ArtifactResolver ) -> Result<Vec<PathBuf>, ResolveError> {
		let mut sets = self.sets.lock().map_err(|_| RequirementError::LockRejected )?;
		let set = sets.get( name ).ok_or_else(|| RequirementError::UnknownSet( name.to_string() ))?;
		if let Some( artifacts ) = &set.resolved {
			debug!( set = name, artifacts = artifacts.len(), "Requirement set already resolved" );
			return Ok( artifacts.clone() );
		}

		let coordinates = collect_coordinates( &sets, name )?;
		debug!( set = name, coordinates = %coordinates.iter().join( ", " ), "Resolving requirement set" );
		let artifacts = resolver.resolve( &coordinates )?;

		let mut frozen = ancestors( &sets, name )?;
		frozen.push( name.to_string() );
		frozen.iter().for_each(| frozen | if let Some( set ) = sets.get_mut( frozen ) { set.frozen = true });
		if let Some( set ) = sets.get_mut( name ) { set.resolved = Some( artifacts.clone() ) }
		Ok( artifacts )
	}

}

/// Every set reachable from `name` through its parents, excluding `name` itself.
fn ancestors( sets: &HashMap<String, RequirementSet>, name: &str ) -> Result<Vec<String>, RequirementError> {
	let mut visited = HashSet::new();
	let mut pending = vec![ name.to_string() ];
	let mut found = Vec::new();
	while let Some( current ) = pending.pop() {
		let set = sets.get( &current ).ok_or_else(|| RequirementError::UnknownSet( current.clone() ))?;
		set.parents.iter()
			.filter(| parent | visited.insert( (*parent).clone() ))
			.for_each(| parent | {
				found.push( parent.clone() );
				pending.push( parent.clone() );
			});
	}
	Ok( found )
}

fn collect_coordinates( sets: &HashMap<String, RequirementSet>, name: &str ) -> Result<Vec<ModuleCoordinate>, RequirementError> {
	let own = sets.get( name ).ok_or_else(|| RequirementError::UnknownSet( name.to_string() ))?;
	let inherited = ancestors( sets, name )?
		.into_iter()
		.filter_map(| ancestor | sets.get( &ancestor ))
		.flat_map(| set | set.coordinates.iter() );
	Ok( own.coordinates.iter().chain( inherited ).unique().cloned().collect() )
}

#[cfg( test )]
mod tests {
	use super::* ;

	fn coordinate( raw: &str ) -> ModuleCoordinate { raw.parse().unwrap() }

	#[test]
	fn child_sees_parent_coordinates() {
		let registry = RequirementRegistry::new();
		registry.maybe_create( "base" ).unwrap();
		registry.maybe_create( "rewriteRun" ).unwrap();
		registry.declare( "base", coordinate( "com.example:checks:1.0" )).unwrap();
		registry.extend_from( "rewriteRun", "base" ).unwrap();
		registry.declare( "rewriteRun", coordinate( "org.openrewrite:rewrite-xml:7.0.0" )).unwrap();
		registry.declare( "rewriteRun", coordinate( "com.example:checks:1.0" )).unwrap();

		assert_eq!( registry.coordinates( "rewriteRun" ).unwrap(), vec![
			coordinate( "org.openrewrite:rewrite-xml:7.0.0" ),
			coordinate( "com.example:checks:1.0" ),
		]);
	}

	#[test]
	fn maybe_create_is_idempotent() {
		let registry = RequirementRegistry::new();
		assert!( registry.maybe_create( "base" ).unwrap() );
		assert!( !registry.maybe_create( "base" ).unwrap() );
		assert!( registry.contains( "base" ));
	}

	#[test]
	fn rejects_cycles_and_unknown_sets() {
		let registry = RequirementRegistry::new();
		registry.maybe_create( "a" ).unwrap();
		registry.maybe_create( "b" ).unwrap();
		registry.extend_from( "b", "a" ).unwrap();
		assert!( matches!( registry.extend_from( "a", "b" ), Err( RequirementError::Cycle { .. })));
		assert!( matches!( registry.extend_from( "a", "a" ), Err( RequirementError::Cycle { .. })));
		assert!( matches!( registry.extend_from( "a", "missing" ), Err( RequirementError::UnknownSet( _ ))));
		assert!( matches!(
			registry.declare( "missing", coordinate( "a:b:1" )),
			Err( RequirementError::UnknownSet( _ )),
		));
	}
}
