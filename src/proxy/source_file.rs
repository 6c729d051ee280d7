use std::path::PathBuf ;

use crate::dispatch::DispatchError ;

proxy!{
	/// A parsed source file.
	SourceFile
}

impl SourceFile {

	/// Path of the file relative to the base directory it was parsed against.
	pub fn source_path( &self ) -> Result<PathBuf, DispatchError> {
		self.handle.invoke( "get-source-path", &[], vec![] )?.into_path()
	}

	/// Renders the file back to text.
	pub fn print( &self ) -> Result<String, DispatchError> {
		self.handle.invoke( "print", &[], vec![] )?.into_string()
	}

}
