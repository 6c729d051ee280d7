use std::collections::BTreeMap ;
use rewrite_facade::{ concepts, Cause, Dispatcher, Kind, Target, Value };
use crate::stub_boundary::{ engine_facade, CallLog, StubBoundary, ENVIRONMENT_BUILDER };

#[test]
fn foreign_reference_is_rejected_before_dispatch() {

	let first_log = CallLog::default();
	let second_log = CallLog::default();
	let first = engine_facade( &first_log );
	let second = engine_facade( &second_log );

	let loader = first.yaml_resource_loader( &b""[..], "rewrite.yml", &BTreeMap::new() ).unwrap();
	let err = second.environment_builder( &BTreeMap::new() ).unwrap().load( &loader ).unwrap_err();

	assert!( matches!( err.cause(), Cause::ForeignReference { .. }), "{:?}", err );
	assert!( !second_log.contains( &format!( "{}.load", ENVIRONMENT_BUILDER )));
	assert!( !first_log.contains( &format!( "{}.load", ENVIRONMENT_BUILDER )));

}

#[test]
fn argument_shape_is_checked_before_dispatch() {

	let log = CallLog::default();
	let dispatcher = Dispatcher::new( Box::new( StubBoundary::engine( &log )));
	let concept = dispatcher.load_concept( concepts::ENVIRONMENT ).unwrap();

	let err = dispatcher.invoke(
		Target::Static( &concept, "builder" ),
		&[ Kind::List ],
		vec![ Value::String( "not properties".to_string() )],
	).unwrap_err();

	match err.cause() {
		Cause::ArgumentShape { expected, found } => {
			assert_eq!( expected, &[ Kind::List ]);
			assert_eq!( found, &[ Kind::String ]);
		},
		cause => panic!( "Expected an argument shape mismatch, found: {:#?}", cause ),
	}
	assert_eq!( err.operation(), format!( "{}::builder", concepts::ENVIRONMENT ));
	assert!( !log.contains( &format!( "{}::builder", concepts::ENVIRONMENT )));

}

#[test]
fn arity_is_checked_before_dispatch() {

	let log = CallLog::default();
	let dispatcher = Dispatcher::new( Box::new( StubBoundary::engine( &log )));
	let concept = dispatcher.load_concept( concepts::YAML_PARSER ).unwrap();

	let err = dispatcher.invoke( Target::Constructor( &concept ), &[], vec![ Value::Bool( true )]).unwrap_err();

	assert!( matches!( err.cause(), Cause::ArgumentShape { .. }));
	assert!( !log.contains( &format!( "{}::new", concepts::YAML_PARSER )));

}

#[test]
fn unknown_concept_is_a_dispatch_error() {

	let log = CallLog::default();
	let dispatcher = Dispatcher::new( Box::new( StubBoundary::engine( &log )));

	let err = dispatcher.load_concept( "openrewrite:core/missing#thing" ).unwrap_err();

	assert!( matches!( err.cause(), Cause::UnknownConcept( name ) if name == "openrewrite:core/missing#thing" ));
	assert!( err.to_string().contains( "openrewrite:core/missing#thing" ));

}
