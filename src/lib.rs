//! Isolated, late-bound access to a rewrite engine packaged as WebAssembly
//! components.
//!
//! The engine never shares symbols with the host. Its modules are resolved to
//! component artifacts on first use and loaded into a private loading
//! boundary; the host only ever holds opaque references to objects living in
//! that boundary and calls operations on them by name.
//!
//! # Core Concepts
//!
//! - [`RewriteFacade`]: The single construction surface. Builds the boundary lazily, at
//! 	most once, and instantiates the initial proxies (environment builder, parsers,
//! 	execution context, resource loader).
//!
//! - [`RequirementRegistry`]: Named, layered sets of [`ModuleCoordinate`]s owned by the
//! 	host [`Project`]. A set is materialised through an [`ArtifactResolver`] exactly once
//! 	and is frozen afterwards.
//!
//! - [`Boundary`]: An isolated environment holding boundary-side objects. [`WasmBoundary`]
//! 	instantiates every artifact into one wasmtime store whose linker provides nothing
//! 	but the error callback bridge.
//!
//! - [`Dispatcher`]: Performs every late-bound call. Checks the argument shape and that
//! 	no reference crosses boundaries, then folds any failure into a [`DispatchError`].
//!
//! - [`proxy`]: One typed wrapper per boundary-side concept. Each proxy owns exactly one
//! 	[`ObjectRef`] and forwards its operations through the dispatcher.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::BTreeMap ;
//! use std::path::{ Path, PathBuf };
//! use std::sync::Arc ;
//! use rewrite_facade::{ MavenLayoutResolver, PluginConfig, Project, RewriteFacade, TaskContext };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // The project owns the requirement sets and knows where artifacts live.
//! let project = Arc::new( Project::new( MavenLayoutResolver::new([ "/opt/components" ])));
//! project.requirements().maybe_create( "rewrite" )?;
//!
//! let facade = RewriteFacade::new(
//! 	"rewrite",
//! 	PluginConfig::new( "7.0.0" )?,
//! 	TaskContext::new( "Run", Arc::clone( &project )),
//! );
//!
//! // The boundary is resolved and loaded here, on first use.
//! let environment = facade.environment_builder( &BTreeMap::new() )?
//! 	.scan_user_home()?
//! 	.build()?;
//! let recipe = environment.activate_recipes( &[ "org.example.Foo" ])?;
//!
//! let context = facade.execution_context(| failure | eprintln!( "{}", failure ))?;
//! let sources = facade.yaml_parser()?.parse( &[ PathBuf::from( "app.yml" )], Path::new( "." ), &context )?;
//! for result in recipe.run( &sources )? {
//! 	println!( "{}", result.diff()? );
//! }
//! # Ok(())
//! # }
//! ```

mod coordinate ;
mod requirements ;
mod resolver ;
mod config ;
mod task ;
mod value ;
mod dispatch ;
mod object_table ;
mod boundary ;
mod facade ;
pub mod proxy ;

#[doc( no_inline )]
pub use wasmtime::Engine ;
#[doc( no_inline )]
pub use wasmtime::component::Component ;

pub use coordinate::{ ModuleCoordinate, CoordinateError, FUNCTIONAL_MODULES, DEFAULT_DIAGNOSTICS_MODULE };
pub use requirements::{ RequirementRegistry, RequirementError };
pub use resolver::{ ArtifactResolver, MavenLayoutResolver, ResolveError };
pub use config::{ PluginConfig, ConfigError, UnknownOutcomePolicy };
pub use task::{ HostRuntime, FixedRuntime, ProcessRuntime, Project, TaskContext };
pub use value::{ Value, Kind };
pub use dispatch::{
	Boundary, BoundaryId, BoundaryFailure, CallbackId, Cause, ConceptHandle,
	DispatchError, Dispatcher, ErrorCallback, ObjectRef, Target,
};
pub use boundary::{ BoundaryContext, BoundaryError, BoundaryFactory, WasmBoundary, WasmBoundaryFactory, HOST_CALLBACKS, ON_ERROR };
pub use facade::{ concepts, FacadeError, Properties, RewriteFacade };
