use std::path::PathBuf ;

use crate::dispatch::DispatchError ;
use crate::value::{ Kind, Value };
use super::{ path_list, NamedStyles, Proxy, Recipe, RecipeDescriptor, ResourceLoader };

proxy!{
	/// Collects recipe and style sources before building an [`Environment`].
	///
	/// Every step returns the builder itself, so calls chain:
	///
	/// ```ignore
	/// let environment = facade.environment_builder( &properties )?
	/// 	.scan_user_home()?
	/// 	.load( &loader )?
	/// 	.build()?;
	/// ```
	EnvironmentBuilder
}

proxy!{
	/// The recipes and styles known to the boundary.
	Environment
}

impl EnvironmentBuilder {

	/// Scans the boundary's own classpath, restricted to `accept_packages`.
	pub fn scan_runtime_classpath( self, accept_packages: &[&str] ) -> Result<Self, DispatchError> {
		self.handle.invoke( "scan-runtime-classpath", &[ Kind::List ], vec![ Value::strings( accept_packages )])?.ignore();
		Ok( self )
	}

	/// Scans explicit classpath entries, restricted to `accept_packages`.
	pub fn scan_classpath( self, classpath: &[PathBuf], accept_packages: &[&str] ) -> Result<Self, DispatchError> {
		self.handle.invoke(
			"scan-classpath",
			&[ Kind::List, Kind::List ],
			vec![ path_list( classpath ), Value::strings( accept_packages )],
		)?.ignore();
		Ok( self )
	}

	/// Scans the declarations found in the user's home directory.
	pub fn scan_user_home( self ) -> Result<Self, DispatchError> {
		self.handle.invoke( "scan-user-home", &[], vec![] )?.ignore();
		Ok( self )
	}

	/// Merges in the declarations of one resource loader.
	pub fn load( self, loader: &ResourceLoader ) -> Result<Self, DispatchError> {
		self.handle.invoke( "load", &[ Kind::Object ], vec![ loader.to_value() ])?.ignore();
		Ok( self )
	}

	pub fn build( self ) -> Result<Environment, DispatchError> {
		self.handle.invoke( "build", &[], vec![] )?.into_proxy()
	}

}

impl Environment {

	/// The styles with the given names, in the order the boundary returns them.
	pub fn activate_styles( &self, names: &[&str] ) -> Result<Vec<NamedStyles>, DispatchError> {
		self.handle.invoke( "activate-styles", &[ Kind::List ], vec![ Value::strings( names )])?.into_proxies()
	}

	/// A single recipe composed of every named recipe.
	pub fn activate_recipes( &self, names: &[&str] ) -> Result<Recipe, DispatchError> {
		self.handle.invoke( "activate-recipes", &[ Kind::List ], vec![ Value::strings( names )])?.into_proxy()
	}

	pub fn list_recipe_descriptors( &self ) -> Result<Vec<RecipeDescriptor>, DispatchError> {
		self.handle.invoke( "list-recipe-descriptors", &[], vec![] )?.into_proxies()
	}

	pub fn list_styles( &self ) -> Result<Vec<NamedStyles>, DispatchError> {
		self.handle.invoke( "list-styles", &[], vec![] )?.into_proxies()
	}

}
