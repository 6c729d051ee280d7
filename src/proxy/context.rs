proxy!{
	/// Boundary-side execution state shared by parsers and recipes. Reports
	/// non-fatal per-item errors to the callback it was created with.
	ExecutionContext
}

proxy!{
	/// Recipe and style declarations read from a YAML document, ready to be
	/// loaded into an [`EnvironmentBuilder`]( super::EnvironmentBuilder ).
	ResourceLoader
}
