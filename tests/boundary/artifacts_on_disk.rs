use std::sync::Arc ;
use rewrite_facade::{
	BoundaryError, BoundaryFactory, Cause, Dispatcher, FacadeError, MavenLayoutResolver, PluginConfig,
	Project, RewriteFacade, TaskContext, Target, Value, Engine, WasmBoundaryFactory, concepts,
};
use crate::components::{ EXAMPLE, INTERFACE };

#[test]
fn factory_loads_components_from_files() {

	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join( "example.wat" );
	std::fs::write( &path, EXAMPLE ).unwrap();

	let boundary = WasmBoundaryFactory::new( Engine::default() ).create( &[ path ]).unwrap();
	let dispatcher = Dispatcher::new( boundary );
	let concept = dispatcher.load_concept( INTERFACE ).unwrap();

	assert_eq!( dispatcher.invoke( Target::Static( &concept, "get-value" ), &[], vec![] ).unwrap(), Value::Integer( 42 ));

}

#[test]
fn invalid_artifact_fails_to_compile() {

	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join( "garbage.wasm" );
	std::fs::write( &path, b"\0asm garbage" ).unwrap();

	match WasmBoundaryFactory::default().create( &[ path.clone() ]) {
		Err( BoundaryError::Compile { artifact, .. }) => assert_eq!( artifact, path ),
		Err( err ) => panic!( "Expected a compile failure, found: {:#?}", err ),
		Ok( _ ) => panic!( "Expected a compile failure" ),
	}

}

#[test]
fn facade_resolves_and_loads_real_artifacts() {

	let repository = tempfile::tempdir().unwrap();
	let config = PluginConfig::new( "7.0.0" ).unwrap();
	for coordinate in config.modules().unwrap() {
		let path = MavenLayoutResolver::artifact_path( repository.path(), &coordinate );
		std::fs::create_dir_all( path.parent().unwrap() ).unwrap();
		std::fs::write( &path, EXAMPLE ).unwrap();
	}

	let project = Arc::new( Project::new( MavenLayoutResolver::new([ repository.path().to_path_buf() ])));
	project.requirements().maybe_create( "rewrite" ).unwrap();
	let facade = RewriteFacade::new( "rewrite", config, TaskContext::new( "Run", Arc::clone( &project )));

	// The components load, but none of them defines the rewrite concepts.
	match facade.yaml_parser() {
		Err( FacadeError::Dispatch( err )) => assert!( matches!( err.cause(), Cause::UnknownConcept( name ) if name == concepts::YAML_PARSER )),
		value => panic!( "Expected an unknown concept, found: {:#?}", value ),
	}
	assert!( project.requirements().is_resolved( "rewriteRun" ));

}

#[test]
fn facade_reports_missing_artifacts() {

	let repository = tempfile::tempdir().unwrap();
	let project = Arc::new( Project::new( MavenLayoutResolver::new([ repository.path().to_path_buf() ])));
	project.requirements().maybe_create( "rewrite" ).unwrap();
	let facade = RewriteFacade::new( "rewrite", PluginConfig::new( "7.0.0" ).unwrap(), TaskContext::new( "Run", project ));

	match facade.xml_parser() {
		Err( FacadeError::Boundary( err )) => assert!( matches!( *err, BoundaryError::Resolve( _ ))),
		value => panic!( "Expected a boundary failure, found: {:#?}", value ),
	}

}
