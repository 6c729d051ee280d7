use wasmtime::component::{ Resource, ResourceAny, ResourceTable };

use crate::dispatch::{ Cause, ObjectRef };



/// A boundary-side object held on behalf of the host.
#[derive( Debug )]
struct StoredObject {
	handle: ResourceAny,
}

/// Slots for every boundary-side object the host has been handed.
///
/// The boundary keeps ownership of the objects; the host only ever sees the
/// slot number inside an [`ObjectRef`]. Objects live as long as the boundary's
/// store does.
pub(crate) struct ObjectTable {
	table: ResourceTable,
}

impl ObjectTable {

	/// Stores `handle` and returns the slot it can be found under.
	pub fn attach( &mut self, handle: ResourceAny ) -> Result<u32, Cause> {
		self.table.push( StoredObject { handle })
			.map(| resource | resource.rep() )
			.map_err(|_| Cause::ObjectTableFull )
	}

	/// The boundary-side handle behind `object`.
	pub fn lookup( &self, object: &ObjectRef ) -> Result<ResourceAny, Cause> {
		self.table.get( &Resource::<StoredObject>::new_own( object.slot() ))
			.map(| stored | stored.handle )
			.map_err(|_| Cause::StaleReference { type_name: object.type_name().to_string(), slot: object.slot() })
	}

}

impl Default for ObjectTable {
	fn default() -> Self { Self { table: ResourceTable::new() }}
}

impl std::fmt::Debug for ObjectTable {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ObjectTable" ).finish_non_exhaustive()
	}
}
