use tracing::warn ;

use crate::config::UnknownOutcomePolicy ;
use crate::dispatch::{ DispatchError, Target };
use crate::value::Kind ;
use super::{ proxy_list, Proxy, SourceFile, Validated };

proxy!{
	/// A transformation that can be run over source files.
	Recipe
}

proxy!{
	/// The change one recipe run made to one source file.
	RecipeResult
}

impl Recipe {

	/// Runs the recipe. Results come back in the order the boundary produced them.
	pub fn run( &self, sources: &[SourceFile] ) -> Result<Vec<RecipeResult>, DispatchError> {
		self.handle.invoke( "run", &[ Kind::List ], vec![ proxy_list( sources )])?.into_proxies()
	}

	pub fn name( &self ) -> Result<String, DispatchError> {
		self.handle.invoke( "get-name", &[], vec![] )?.into_string()
	}

	/// Validates the recipe's configuration.
	///
	/// Outcomes that are neither `invalid` nor `both` are handled according to
	/// the façade's [`UnknownOutcomePolicy`].
	pub fn validate_all( &self ) -> Result<Vec<Validated>, DispatchError> {
		let policy = self.handle.policy();
		let mut outcomes = Vec::new();
		for ( tag, handle ) in self.handle.invoke( "validate-all", &[], vec![] )?.into_tagged_handles()? {
			match ( Validated::classify( tag, handle ), policy ) {
				( Ok( outcome ), _ ) => outcomes.push( outcome ),
				( Err( unknown ), UnknownOutcomePolicy::Skip ) => warn!(
					recipe = %self.reference().type_name(),
					outcome = %unknown.reference().type_name(),
					tag = ?unknown.tag(),
					"Skipping validation outcome of unknown type",
				),
				( Err( unknown ), UnknownOutcomePolicy::Fail ) => return Err( unknown.into_error(
					Target::Method( self.reference(), "validate-all" ).to_string()
				)),
			}
		}
		Ok( outcomes )
	}

}

impl RecipeResult {

	/// The file before the change. `None` if the recipe created it.
	pub fn before( &self ) -> Result<Option<SourceFile>, DispatchError> {
		self.handle.invoke( "get-before", &[], vec![] )?.into_optional()
	}

	/// The file after the change. `None` if the recipe deleted it.
	pub fn after( &self ) -> Result<Option<SourceFile>, DispatchError> {
		self.handle.invoke( "get-after", &[], vec![] )?.into_optional()
	}

	/// Every recipe that contributed to this change, in no particular order.
	pub fn recipes_that_made_changes( &self ) -> Result<Vec<Recipe>, DispatchError> {
		self.handle.invoke( "get-recipes-that-made-changes", &[], vec![] )?.into_proxies()
	}

	/// A unified diff of the change.
	pub fn diff( &self ) -> Result<String, DispatchError> {
		self.handle.invoke( "diff", &[], vec![] )?.into_string()
	}

}
