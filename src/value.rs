//! Raw values exchanged with a boundary.
//!
//! [`Value`] is what the dispatcher hands to and receives from boundary-side
//! code. It is deliberately untyped: typed meaning is restored by the proxy
//! layer, which knows what each operation returns.

use crate::dispatch::{ ObjectRef, CallbackId };



/// A host-side rendition of a boundary-side value.
#[derive( Debug, Clone, PartialEq )]
pub enum Value {
	/// No value (void return, empty tuple).
	Unit,
	Bool( bool ),
	/// Any integer width. Sent to the boundary as a signed 64-bit integer.
	Integer( i64 ),
	String( String ),
	/// An opaque byte stream, forwarded unchanged.
	Bytes( Vec<u8> ),
	/// An ordered collection.
	List( Vec<Value> ),
	/// A nullable value. `Option( None )` is an explicit absence.
	Option( Option<Box<Value>> ),
	Tuple( Vec<Value> ),
	Record( Vec<( String, Value )> ),
	/// A tagged union case, possibly carrying a payload.
	Variant( String, Option<Box<Value>> ),
	/// A reference to a boundary-side object.
	Object( ObjectRef ),
	/// A host callback previously registered with the boundary.
	Callback( CallbackId ),
}

/// The shape of a single argument, used to match arguments against an
/// operation before it is dispatched.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Kind {
	Unit,
	Bool,
	Integer,
	String,
	Bytes,
	List,
	Option,
	Tuple,
	Record,
	Variant,
	Object,
	Callback,
}

impl Value {

	pub fn kind( &self ) -> Kind {
		match self {
			Self::Unit => Kind::Unit,
			Self::Bool( _ ) => Kind::Bool,
			Self::Integer( _ ) => Kind::Integer,
			Self::String( _ ) => Kind::String,
			Self::Bytes( _ ) => Kind::Bytes,
			Self::List( _ ) => Kind::List,
			Self::Option( _ ) => Kind::Option,
			Self::Tuple( _ ) => Kind::Tuple,
			Self::Record( _ ) => Kind::Record,
			Self::Variant( _, _ ) => Kind::Variant,
			Self::Object( _ ) => Kind::Object,
			Self::Callback( _ ) => Kind::Callback,
		}
	}

	/// A list of strings.
	pub fn strings<S: AsRef<str>>( items: impl IntoIterator<Item = S> ) -> Self {
		Self::List( items.into_iter().map(| item | Self::String( item.as_ref().to_string() )).collect() )
	}

	/// Every object reference contained in this value, at any depth.
	pub fn objects( &self ) -> Vec<&ObjectRef> {
		let mut found = Vec::new();
		self.collect_objects( &mut found );
		found
	}

	fn collect_objects<'a>( &'a self, found: &mut Vec<&'a ObjectRef> ) {
		match self {
			Self::Object( reference ) => found.push( reference ),
			Self::List( items ) | Self::Tuple( items ) => items.iter().for_each(| item | item.collect_objects( found )),
			Self::Record( fields ) => fields.iter().for_each(|( _, item )| item.collect_objects( found )),
			Self::Option( Some( item )) | Self::Variant( _, Some( item )) => item.collect_objects( found ),
			Self::Unit | Self::Bool( _ ) | Self::Integer( _ ) | Self::String( _ ) | Self::Bytes( _ )
			| Self::Option( None ) | Self::Variant( _, None ) | Self::Callback( _ ) => {},
		}
	}

	/// Short description used in error messages.
	pub fn describe( &self ) -> String {
		match self {
			Self::Object( reference ) => format!( "object of type `{}`", reference.type_name() ),
			Self::Variant( tag, _ ) => format!( "variant `{}`", tag ),
			other => format!( "{:?}", other.kind() ).to_lowercase(),
		}
	}

}

impl std::fmt::Display for Kind {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}

impl From<&str> for Value {
	fn from( value: &str ) -> Self { Self::String( value.to_string() ) }
}

impl From<String> for Value {
	fn from( value: String ) -> Self { Self::String( value ) }
}

impl From<bool> for Value {
	fn from( value: bool ) -> Self { Self::Bool( value ) }
}

impl From<Option<Value>> for Value {
	fn from( value: Option<Value> ) -> Self { Self::Option( value.map( Box::new )) }
}
