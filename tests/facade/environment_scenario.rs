use std::collections::BTreeMap ;
use std::path::PathBuf ;
use crate::stub_boundary::{ engine_facade, CallLog, ENVIRONMENT_BUILDER };

#[test]
fn environment_from_user_home_activates_named_recipe() {

	let log = CallLog::default();
	let facade = engine_facade( &log );

	let environment = facade.environment_builder( &BTreeMap::new() ).unwrap()
		.scan_user_home().unwrap()
		.build().unwrap();
	let recipe = environment.activate_recipes( &[ "org.example.Foo" ]).unwrap();

	assert_eq!( recipe.name().unwrap(), "org.example.Foo" );
	assert!( log.contains( &format!( "{}.scan-user-home", ENVIRONMENT_BUILDER )));
	assert!( !log.contains( &format!( "{}.scan-runtime-classpath", ENVIRONMENT_BUILDER )));

}

#[test]
fn environment_builder_chains_every_scan() {

	let log = CallLog::default();
	let facade = engine_facade( &log );

	let environment = facade.environment_builder( &BTreeMap::from([( "a".to_string(), "b".to_string() )])).unwrap()
		.scan_runtime_classpath( &[ "org.openrewrite" ]).unwrap()
		.scan_classpath( &[ PathBuf::from( "libs/a.wasm" )], &[ "org.example" ]).unwrap()
		.scan_user_home().unwrap()
		.build().unwrap();

	let descriptors = environment.list_recipe_descriptors().unwrap()
		.iter()
		.map(| descriptor | descriptor.name().unwrap() )
		.collect::<Vec<_>>();
	assert_eq!( descriptors, [ "org.example.A", "org.example.B", "org.example.C" ]);

}
