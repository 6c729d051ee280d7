use crate::dispatch::{ Cause, DispatchError, ObjectRef };
use crate::facade::concepts ;
use super::{ Handle, Proxy, Wrap };

proxy!{
	/// A single configuration problem.
	Invalid
}

proxy!{
	/// A combination of validation outcomes, at least one of which failed.
	Both
}

/// The outcome of validating a recipe.
///
/// Boundary-side outcomes come back either wrapped in a variant whose case is
/// `invalid` or `both`, or bare, in which case the object's runtime type must
/// be [`concepts::INVALID`] or [`concepts::BOTH`].
#[derive( Debug )]
pub enum Validated {
	Invalid( Invalid ),
	Both( Both ),
}

/// A validation outcome no variant of [`Validated`] covers.
pub(crate) struct UnknownOutcome {
	tag: Option<String>,
	handle: Handle,
}

impl Validated {

	pub(crate) fn classify( tag: Option<String>, handle: Handle ) -> Result<Self, UnknownOutcome> {
		let invalid = match tag.as_deref() {
			Some( "invalid" ) => true,
			Some( "both" ) => false,
			Some( _ ) => return Err( UnknownOutcome { tag, handle }),
			None => match handle.reference().type_name() {
				concepts::INVALID => true,
				concepts::BOTH => false,
				_ => return Err( UnknownOutcome { tag, handle }),
			},
		};
		Ok( match invalid {
			true => Self::Invalid( Invalid::wrap( handle )),
			false => Self::Both( Both::wrap( handle )),
		})
	}

	/// Every individual problem this outcome describes.
	pub fn failures( &self ) -> Result<Vec<Invalid>, DispatchError> {
		match self {
			Self::Invalid( invalid ) => invalid.failures(),
			Self::Both( both ) => both.failures(),
		}
	}

	pub fn as_invalid( &self ) -> Option<&Invalid> {
		match self {
			Self::Invalid( invalid ) => Some( invalid ),
			Self::Both( _ ) => None,
		}
	}

}

impl Proxy for Validated {
	fn reference( &self ) -> &ObjectRef {
		match self {
			Self::Invalid( invalid ) => invalid.reference(),
			Self::Both( both ) => both.reference(),
		}
	}
}

impl Invalid {

	/// Name of the property that failed validation.
	pub fn property( &self ) -> Result<String, DispatchError> {
		self.handle.invoke( "get-property", &[], vec![] )?.into_string()
	}

	pub fn message( &self ) -> Result<String, DispatchError> {
		self.handle.invoke( "get-message", &[], vec![] )?.into_string()
	}

	/// The boundary-side exception behind the failure, if there was one.
	pub fn exception( &self ) -> Result<Option<String>, DispatchError> {
		self.handle.invoke( "get-exception", &[], vec![] )?.into_optional_string()
	}

	pub fn failures( &self ) -> Result<Vec<Invalid>, DispatchError> {
		self.handle.invoke( "failures", &[], vec![] )?.into_proxies()
	}

}

impl Both {
	pub fn failures( &self ) -> Result<Vec<Invalid>, DispatchError> {
		self.handle.invoke( "failures", &[], vec![] )?.into_proxies()
	}
}

impl UnknownOutcome {

	#[inline] pub fn reference( &self ) -> &ObjectRef { self.handle.reference() }
	#[inline] pub fn tag( &self ) -> Option<&str> { self.tag.as_deref() }

	pub fn into_error( self, operation: String ) -> DispatchError {
		let found = match &self.tag {
			Some( tag ) => format!( "validation outcome `{}` of type `{}`", tag, self.reference().type_name() ),
			None => format!( "validation outcome of type `{}`", self.reference().type_name() ),
		};
		DispatchError::new( operation, Cause::UnexpectedValue { expected: "`invalid` or `both` validation outcome", found })
	}

}
