use crate::dispatch::DispatchError ;

proxy!{
	/// A named, activatable set of formatting styles.
	NamedStyles
}

proxy!{
	/// Describes a recipe available in an [`Environment`]( super::Environment ).
	RecipeDescriptor
}

impl NamedStyles {
	pub fn name( &self ) -> Result<String, DispatchError> {
		self.handle.invoke( "get-name", &[], vec![] )?.into_string()
	}
}

impl RecipeDescriptor {
	pub fn name( &self ) -> Result<String, DispatchError> {
		self.handle.invoke( "get-name", &[], vec![] )?.into_string()
	}
}
