//! Turning module coordinates into artifact files.
//!
//! Dependency resolution belongs to the host build tool; this crate only sees it
//! through [`ArtifactResolver`]. [`MavenLayoutResolver`] covers the common case of
//! artifacts that already sit in a local repository.

use std::path::{ Path, PathBuf };
use thiserror::Error ;
use tracing::trace ;

use crate::ModuleCoordinate ;
use crate::requirements::RequirementError ;



/// Errors raised while materialising coordinates into artifacts.
#[derive( Debug, Error )]
pub enum ResolveError {
	/// No repository holds an artifact for this coordinate.
	#[error( "Could not resolve {coordinate} (searched {} locations)", searched.len() )]
	Unresolvable { coordinate: ModuleCoordinate, searched: Vec<PathBuf> },
	/// Reading a repository failed.
	#[error( "IO error while resolving artifacts: {0}" )] Io( #[from] std::io::Error ),
	/// The requirement set itself was invalid.
	#[error( "{0}" )] Requirements( #[from] RequirementError ),
	/// A custom resolver failed (network, version conflict, ...).
	#[error( "Resolver failure: {0}" )] Backend( Box<dyn std::error::Error + Send + Sync> ),
}

/// Materialises a list of coordinates into binary artifacts.
///
/// Implementations are expected to either resolve every coordinate or fail;
/// partial results are never used.
pub trait ArtifactResolver: Send + Sync {
	/// Resolves every coordinate into an artifact path.
	///
	/// # Errors
	/// Fails if any coordinate cannot be resolved.
	fn resolve( &self, coordinates: &[ModuleCoordinate] ) -> Result<Vec<PathBuf>, ResolveError> ;
}

impl<F> ArtifactResolver for F
where
	F: Fn( &[ModuleCoordinate] ) -> Result<Vec<PathBuf>, ResolveError> + Send + Sync,
{
	fn resolve( &self, coordinates: &[ModuleCoordinate] ) -> Result<Vec<PathBuf>, ResolveError> {
		self( coordinates )
	}
}

/// Resolves coordinates against local repositories laid out the Maven way:
/// `<root>/<group as path>/<artifact>/<version>/<artifact>-<version>.wasm`.
///
/// Roots are searched in order; the first hit wins.
#[derive( Debug, Clone )]
pub struct MavenLayoutResolver {
	roots: Vec<PathBuf>,
}

impl MavenLayoutResolver {

	pub fn new( roots: impl IntoIterator<Item = impl Into<PathBuf>> ) -> Self {
		Self { roots: roots.into_iter().map( Into::into ).collect() }
	}

	/// Where `coordinate` would live under `root`.
	pub fn artifact_path( root: &Path, coordinate: &ModuleCoordinate ) -> PathBuf {
		coordinate.group().split( '.' )
			.fold( root.to_path_buf(), | path, segment | path.join( segment ))
			.join( coordinate.artifact() )
			.join( coordinate.version() )
			.join( format!( "{}-{}.wasm", coordinate.artifact(), coordinate.version() ))
	}

	fn locate( &self, coordinate: &ModuleCoordinate ) -> Result<PathBuf, ResolveError> {
		let candidates = self.roots.iter()
			.map(| root | Self::artifact_path( root, coordinate ))
			.collect::<Vec<_>>();
		match candidates.iter().find(| candidate | candidate.is_file() ) {
			Some( found ) => {
				trace!( %coordinate, artifact = %found.display(), "Resolved artifact" );
				Ok( found.clone() )
			},
			None => Err( ResolveError::Unresolvable { coordinate: coordinate.clone(), searched: candidates }),
		}
	}

}

impl ArtifactResolver for MavenLayoutResolver {
	fn resolve( &self, coordinates: &[ModuleCoordinate] ) -> Result<Vec<PathBuf>, ResolveError> {
		coordinates.iter().map(| coordinate | self.locate( coordinate )).collect()
	}
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn resolves_from_first_matching_root() {
		let empty = tempfile::tempdir().unwrap();
		let repository = tempfile::tempdir().unwrap();
		let coordinate: ModuleCoordinate = "org.openrewrite:rewrite-yaml:7.0.0".parse().unwrap();
		let artifact = MavenLayoutResolver::artifact_path( repository.path(), &coordinate );
		std::fs::create_dir_all( artifact.parent().unwrap() ).unwrap();
		std::fs::write( &artifact, b"\0asm" ).unwrap();

		let resolver = MavenLayoutResolver::new([ empty.path(), repository.path() ]);
		assert_eq!( resolver.resolve( &[ coordinate ]).unwrap(), vec![ artifact.clone() ]);
		assert!( artifact.ends_with( "org/openrewrite/rewrite-yaml/7.0.0/rewrite-yaml-7.0.0.wasm" ));
	}

	#[test]
	fn missing_artifact_is_unresolvable() {
		let repository = tempfile::tempdir().unwrap();
		let resolver = MavenLayoutResolver::new([ repository.path() ]);
		let coordinate: ModuleCoordinate = "org.openrewrite:rewrite-xml:7.0.0".parse().unwrap();
		match resolver.resolve( &[ coordinate ]) {
			Err( ResolveError::Unresolvable { searched, .. }) => assert_eq!( searched.len(), 1 ),
			other => panic!( "Expected Unresolvable, found: {:?}", other ),
		}
	}
}
