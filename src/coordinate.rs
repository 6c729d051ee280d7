//! Module coordinates.
//!
//! A [`ModuleCoordinate`] names one unit of boundary-side code by `group:artifact`
//! and pins it to a version. Coordinates are plain values: two equal coordinates
//! declared twice are harmless, the requirement set simply ignores the duplicate.

use std::str::FromStr ;
use thiserror::Error ;



/// Artifacts every boundary needs, all pinned to the configured rewrite version.
pub const FUNCTIONAL_MODULES: [&str; 6] = [
	"org.openrewrite:rewrite-java-11",
	"org.openrewrite:rewrite-java-8",
	"org.openrewrite:rewrite-xml",
	"org.openrewrite:rewrite-yaml",
	"org.openrewrite:rewrite-properties",
	"org.openrewrite:rewrite-maven",
];

/// Diagnostics output for boundary-side code, pinned independently of the rest.
pub const DEFAULT_DIAGNOSTICS_MODULE: &str = "org.slf4j:slf4j-simple:1.7.30" ;

/// A `(name, version)` pair identifying a unit of boundary-side code.
///
/// The name is the `group:artifact` part; the version is applied verbatim.
#[derive( Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct ModuleCoordinate {
	group: String,
	artifact: String,
	version: String,
}

/// Failure to parse a `group:artifact:version` string.
#[derive( Debug, Error, PartialEq, Eq )]
pub enum CoordinateError {
	/// The string did not have exactly three `:`-separated parts.
	#[error( "Malformed coordinate `{0}`, expected `group:artifact:version`" )] Malformed( String ),
	/// One of the three parts was empty.
	#[error( "Empty {part} in coordinate `{coordinate}`" )]
	EmptyPart { coordinate: String, part: &'static str },
}

impl ModuleCoordinate {

	/// Creates a coordinate from a `group:artifact` name and a version.
	///
	/// # Errors
	/// Fails if the name is not `group:artifact` or any part is empty.
	pub fn new( name: &str, version: impl Into<String> ) -> Result<Self, CoordinateError> {
		format!( "{}:{}", name, version.into() ).parse()
	}

	/// Pins each of the [`FUNCTIONAL_MODULES`] to `version`.
	///
	/// # Errors
	/// Fails if `version` is empty or contains `:`.
	pub fn functional_modules( version: &str ) -> Result<Vec<Self>, CoordinateError> {
		FUNCTIONAL_MODULES.iter().map(| name | Self::new( name, version )).collect()
	}

	#[inline] pub fn group( &self ) -> &str { &self.group }
	#[inline] pub fn artifact( &self ) -> &str { &self.artifact }
	#[inline] pub fn version( &self ) -> &str { &self.version }

	/// The `group:artifact` part.
	pub fn name( &self ) -> String { format!( "{}:{}", self.group, self.artifact ) }

}

impl FromStr for ModuleCoordinate {
	type Err = CoordinateError ;

	fn from_str( coordinate: &str ) -> Result<Self, Self::Err> {
		let parts = coordinate.split( ':' ).collect::<Vec<_>>();
		let [ group, artifact, version ] = parts.as_slice() else {
			return Err( CoordinateError::Malformed( coordinate.to_string() ));
		};
		[( "group", group ), ( "artifact", artifact ), ( "version", version )]
			.into_iter()
			.find(|( _, value )| value.trim().is_empty() )
			.map_or( Ok(()), |( part, _ )| Err( CoordinateError::EmptyPart { coordinate: coordinate.to_string(), part }))?;
		Ok( Self {
			group: (*group).to_string(),
			artifact: (*artifact).to_string(),
			version: (*version).to_string(),
		})
	}
}

impl std::fmt::Display for ModuleCoordinate {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		write!( f, "{}:{}:{}", self.group, self.artifact, self.version )
	}
}

impl<'de> serde::Deserialize<'de> for ModuleCoordinate {
	fn deserialize<D: serde::Deserializer<'de>>( deserializer: D ) -> Result<Self, D::Error> {
		let raw = String::deserialize( deserializer )?;
		raw.parse().map_err( serde::de::Error::custom )
	}
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn parses_and_prints() {
		let coordinate: ModuleCoordinate = "org.openrewrite:rewrite-xml:7.0.0".parse().unwrap();
		assert_eq!( coordinate.group(), "org.openrewrite" );
		assert_eq!( coordinate.artifact(), "rewrite-xml" );
		assert_eq!( coordinate.version(), "7.0.0" );
		assert_eq!( coordinate.name(), "org.openrewrite:rewrite-xml" );
		assert_eq!( coordinate.to_string(), "org.openrewrite:rewrite-xml:7.0.0" );
	}

	#[test]
	fn rejects_missing_and_empty_parts() {
		assert!( matches!( "a:b".parse::<ModuleCoordinate>(), Err( CoordinateError::Malformed( _ ))));
		assert!( matches!( "a:b:c:d".parse::<ModuleCoordinate>(), Err( CoordinateError::Malformed( _ ))));
		assert!( matches!(
			"a::1.0".parse::<ModuleCoordinate>(),
			Err( CoordinateError::EmptyPart { part: "artifact", .. }),
		));
	}

	#[test]
	fn pins_every_functional_module() {
		let modules = ModuleCoordinate::functional_modules( "7.0.0" ).unwrap();
		assert_eq!( modules.len(), FUNCTIONAL_MODULES.len() );
		assert!( modules.iter().all(| module | module.version() == "7.0.0" ));
		assert_eq!( modules[0].name(), "org.openrewrite:rewrite-java-11" );
	}
}
