//! Plugin configuration.
//!
//! ```toml
//! rewrite-version = "7.0.0"
//! diagnostics = "org.slf4j:slf4j-simple:1.7.30"   # optional
//! unknown-validation-outcome = "skip"              # optional, "skip" | "fail"
//! ```

use std::path::Path ;
use serde::Deserialize ;
use thiserror::Error ;

use crate::{ ModuleCoordinate, CoordinateError };
use crate::coordinate::DEFAULT_DIAGNOSTICS_MODULE ;



/// Errors raised while loading a [`PluginConfig`].
#[derive( Debug, Error )]
pub enum ConfigError {
	#[error( "IO error: {0}" )] Io( #[from] std::io::Error ),
	#[error( "TOML parse error: {0}" )] Toml( #[from] toml::de::Error ),
	#[error( "Invalid rewrite version: {0}" )] Version( #[from] CoordinateError ),
}

/// What to do with a validation outcome whose runtime type is neither
/// `invalid` nor `both`.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize )]
#[serde( rename_all = "kebab-case" )]
pub enum UnknownOutcomePolicy {
	/// Leave it out of the result and emit a warning.
	#[default] Skip,
	/// Fail the whole `validate_all` call.
	Fail,
}

/// Settings the façade needs to build its boundary.
#[derive( Debug, Clone, PartialEq, Eq, Deserialize )]
#[serde( rename_all = "kebab-case", deny_unknown_fields )]
pub struct PluginConfig {
	rewrite_version: String,
	#[serde( default = "default_diagnostics" )]
	diagnostics: ModuleCoordinate,
	#[serde( default )]
	unknown_validation_outcome: UnknownOutcomePolicy,
}

fn default_diagnostics() -> ModuleCoordinate {
	// Constant is a well-formed `group:artifact:version`.
	DEFAULT_DIAGNOSTICS_MODULE.parse().unwrap_or_else(| err | unreachable!( "{}", err ))
}

impl PluginConfig {

	/// Configuration pinned to `rewrite_version` with every other setting at its default.
	///
	/// # Errors
	/// Fails if the version cannot be used in a coordinate.
	pub fn new( rewrite_version: impl Into<String> ) -> Result<Self, ConfigError> {
		Self {
			rewrite_version: rewrite_version.into(),
			diagnostics: default_diagnostics(),
			unknown_validation_outcome: UnknownOutcomePolicy::default(),
		}.validated()
	}

	/// Parses a TOML document.
	///
	/// # Errors
	/// Fails on malformed TOML, unknown keys or an unusable version.
	pub fn from_toml_str( source: &str ) -> Result<Self, ConfigError> {
		toml::from_str::<Self>( source )?.validated()
	}

	/// Reads and parses a TOML file.
	///
	/// # Errors
	/// Fails if the file cannot be read or does not parse.
	pub fn from_file( path: impl AsRef<Path> ) -> Result<Self, ConfigError> {
		Self::from_toml_str( &std::fs::read_to_string( path )? )
	}

	pub fn with_diagnostics( mut self, diagnostics: ModuleCoordinate ) -> Self {
		self.diagnostics = diagnostics ;
		self
	}

	pub fn with_unknown_validation_outcome( mut self, policy: UnknownOutcomePolicy ) -> Self {
		self.unknown_validation_outcome = policy ;
		self
	}

	#[inline] pub fn rewrite_version( &self ) -> &str { &self.rewrite_version }
	#[inline] pub fn diagnostics( &self ) -> &ModuleCoordinate { &self.diagnostics }
	#[inline] pub fn unknown_validation_outcome( &self ) -> UnknownOutcomePolicy { self.unknown_validation_outcome }

	/// Every coordinate the boundary requires: the functional modules pinned
	/// to the rewrite version, then the diagnostics module.
	///
	/// # Errors
	/// Fails if the rewrite version cannot be used in a coordinate.
	pub fn modules( &self ) -> Result<Vec<ModuleCoordinate>, CoordinateError> {
		let mut modules = ModuleCoordinate::functional_modules( &self.rewrite_version )?;
		modules.push( self.diagnostics.clone() );
		Ok( modules )
	}

	fn validated( self ) -> Result<Self, ConfigError> {
		self.modules()?;
		Ok( self )
	}

}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn reads_minimal_toml() {
		let config = PluginConfig::from_toml_str( r#"rewrite-version = "7.0.0""# ).unwrap();
		assert_eq!( config.rewrite_version(), "7.0.0" );
		assert_eq!( config.diagnostics().to_string(), DEFAULT_DIAGNOSTICS_MODULE );
		assert_eq!( config.unknown_validation_outcome(), UnknownOutcomePolicy::Skip );
	}

	#[test]
	fn reads_every_key() {
		let config = PluginConfig::from_toml_str( r#"
			rewrite-version = "7.1.0"
			diagnostics = "com.example:logging:2.0"
			unknown-validation-outcome = "fail"
		"# ).unwrap();
		assert_eq!( config.diagnostics().to_string(), "com.example:logging:2.0" );
		assert_eq!( config.unknown_validation_outcome(), UnknownOutcomePolicy::Fail );
		let modules = config.modules().unwrap();
		assert_eq!( modules.len(), 7 );
		assert!( modules[..6].iter().all(| module | module.version() == "7.1.0" ));
		assert_eq!( modules[6].version(), "2.0" );
	}

	#[test]
	fn rejects_bad_input() {
		assert!( matches!( PluginConfig::from_toml_str( "" ), Err( ConfigError::Toml( _ ))));
		assert!( matches!( PluginConfig::from_toml_str( r#"rewrite-version = "7.0.0"
			colour = "blue""# ), Err( ConfigError::Toml( _ ))));
		assert!( matches!( PluginConfig::new( "" ), Err( ConfigError::Version( _ ))));
	}
}
