//! The host-side context a façade is scoped to.

use std::sync::Arc ;

use crate::requirements::RequirementRegistry ;
use crate::resolver::ArtifactResolver ;



/// Reports the version of the runtime the host process is running on.
///
/// Consulted every time a version-dependent concept is requested, never cached.
pub trait HostRuntime: Send + Sync {
	fn version( &self ) -> String ;
}

/// A host runtime that always reports the same version.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct FixedRuntime( pub String );

impl HostRuntime for FixedRuntime {
	fn version( &self ) -> String { self.0.clone() }
}

/// Reads the host runtime version from the `HOST_RUNTIME_VERSION` environment
/// variable at every call. Reports an empty version when the variable is unset.
#[derive( Debug, Clone, Copy, Default )]
pub struct ProcessRuntime ;

impl ProcessRuntime {
	pub const VARIABLE: &'static str = "HOST_RUNTIME_VERSION" ;
}

impl HostRuntime for ProcessRuntime {
	fn version( &self ) -> String { std::env::var( Self::VARIABLE ).unwrap_or_default() }
}

/// The host project: its requirement sets and the resolver that materialises them.
///
/// Shared by all tasks of the project.
pub struct Project {
	requirements: RequirementRegistry,
	resolver: Box<dyn ArtifactResolver>,
}

impl Project {

	pub fn new( resolver: impl ArtifactResolver + 'static ) -> Self {
		Self { requirements: RequirementRegistry::new(), resolver: Box::new( resolver ) }
	}

	#[inline] pub fn requirements( &self ) -> &RequirementRegistry { &self.requirements }
	#[inline] pub fn resolver( &self ) -> &dyn ArtifactResolver { self.resolver.as_ref() }

}

impl std::fmt::Debug for Project {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Project" )
			.field( "requirements", &self.requirements )
			.field( "resolver", &"<resolver>" )
			.finish()
	}
}

/// One task instance of the host build. Each façade belongs to exactly one task.
#[derive( Clone )]
pub struct TaskContext {
	name: String,
	project: Arc<Project>,
	runtime: Arc<dyn HostRuntime>,
}

impl TaskContext {

	/// A task named `name` in `project`, reading its runtime version through [`ProcessRuntime`].
	pub fn new( name: impl Into<String>, project: Arc<Project> ) -> Self {
		Self { name: name.into(), project, runtime: Arc::new( ProcessRuntime ) }
	}

	pub fn with_host_runtime( mut self, runtime: impl HostRuntime + 'static ) -> Self {
		self.runtime = Arc::new( runtime );
		self
	}

	#[inline] pub fn name( &self ) -> &str { &self.name }
	#[inline] pub fn project( &self ) -> &Arc<Project> { &self.project }
	#[inline] pub fn host_runtime( &self ) -> &dyn HostRuntime { self.runtime.as_ref() }

	/// Name of the private requirement set this task's boundary is resolved from.
	pub fn requirement_set_name( &self ) -> String { format!( "rewrite{}", self.name ) }

}

impl std::fmt::Debug for TaskContext {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "TaskContext" )
			.field( "name", &self.name )
			.field( "project", &self.project )
			.field( "runtime_version", &self.runtime.version() )
			.finish()
	}
}
