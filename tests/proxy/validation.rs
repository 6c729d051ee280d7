use std::collections::BTreeMap ;
use rewrite_facade::{ Cause, PluginConfig, RewriteFacade, UnknownOutcomePolicy, Value };
use rewrite_facade::proxy::{ Proxy, Validated };
use crate::stub_boundary::{ project, task, CallLog, StubBoundary, StubFactory, StubResolver, StubWorld, BASE_SET, BOTH, INVALID, RECIPE, VALID, VERSION };

/// One boundary-side type carrying every kind of outcome, told apart by the variant wrapping it.
const VALIDATED: &str = "openrewrite:core/validation#validated" ;

fn facade_with_outcomes( policy: UnknownOutcomePolicy, outcomes: fn( &mut StubWorld ) -> Vec<Value> ) -> RewriteFacade {
	let log = CallLog::default();
	let factory = StubFactory::new( move || StubBoundary::engine( &log )
		.on( format!( "{}.validate-all", RECIPE ), move | world, _, _ | Ok( Value::List( outcomes( world ))))
		.on( format!( "{}.get-property", VALIDATED ), | world, receiver, _ | Ok( Value::String( world.label( receiver.unwrap() ))))
	);
	let config = PluginConfig::new( VERSION ).unwrap().with_unknown_validation_outcome( policy );
	RewriteFacade::new( BASE_SET, config, task( &project( &StubResolver::default() ), "11.0.2" ))
		.with_boundary_factory( factory )
}

fn mixed_types( world: &mut StubWorld ) -> Vec<Value> {
	vec![
		world.object( INVALID, "include" ),
		world.object( VALID, "exclude" ),
		world.object( BOTH, "both" ),
	]
}

fn tagged( tag: &str, object: Value ) -> Value {
	Value::Variant( tag.to_string(), Some( Box::new( object )))
}

fn tagged_outcomes( world: &mut StubWorld ) -> Vec<Value> {
	vec![
		tagged( "invalid", world.object( VALIDATED, "include" )),
		tagged( "valid", world.object( VALIDATED, "exclude" )),
		tagged( "both", world.object( VALIDATED, "both" )),
	]
}

#[test]
fn validation_outcomes_are_told_apart_by_runtime_type() {

	let log = CallLog::default();
	let recipe = crate::stub_boundary::engine_facade( &log )
		.environment_builder( &BTreeMap::new() ).unwrap().build().unwrap()
		.activate_recipes( &[ "org.example.Foo" ]).unwrap();

	let outcomes = recipe.validate_all().unwrap();

	assert_eq!( outcomes.len(), 2 );
	let Validated::Invalid( invalid ) = &outcomes[0] else { panic!( "Expected Invalid, found: {:#?}", outcomes[0] ) };
	assert_eq!( invalid.property().unwrap(), "name" );
	assert_eq!( invalid.message().unwrap(), "must not be empty" );
	assert_eq!( invalid.exception().unwrap(), None );
	assert!( matches!( outcomes[1], Validated::Both( _ )));

	let failures = outcomes[1].failures().unwrap()
		.iter()
		.map(| failure | failure.property().unwrap() )
		.collect::<Vec<_>>();
	assert_eq!( failures, [ "left", "right" ]);
	assert_eq!( outcomes[0].failures().unwrap().len(), 1 );
	assert!( outcomes[0].as_invalid().is_some() );
	assert!( outcomes[1].as_invalid().is_none() );

}

#[test]
fn unknown_outcomes_are_skipped_by_default() {

	let recipe = facade_with_outcomes( UnknownOutcomePolicy::default(), mixed_types )
		.environment_builder( &BTreeMap::new() ).unwrap().build().unwrap()
		.activate_recipes( &[ "org.example.Foo" ]).unwrap();

	let outcomes = recipe.validate_all().unwrap();

	let types = outcomes.iter().map(| outcome | outcome.reference().type_name().to_string() ).collect::<Vec<_>>();
	assert_eq!( types, [ INVALID, BOTH ]);

}

#[test]
fn unknown_outcomes_fail_when_configured() {

	let recipe = facade_with_outcomes( UnknownOutcomePolicy::Fail, mixed_types )
		.environment_builder( &BTreeMap::new() ).unwrap().build().unwrap()
		.activate_recipes( &[ "org.example.Foo" ]).unwrap();

	let err = recipe.validate_all().unwrap_err();

	assert_eq!( err.operation(), format!( "{}.validate-all", RECIPE ));
	match err.cause() {
		Cause::UnexpectedValue { found, .. } => assert!( found.contains( VALID ), "{}", found ),
		cause => panic!( "Expected an unexpected value, found: {:#?}", cause ),
	}

}

#[test]
fn invalid_exposes_nested_exception() {

	let log = CallLog::default();
	let factory = StubFactory::new( move || StubBoundary::engine( &log )
		.on( format!( "{}.get-exception", INVALID ), | _, _, _ | Ok( Value::Option( Some( Box::new( Value::String( "IllegalArgumentException".to_string() ))))))
	);
	let facade = crate::stub_boundary::facade( task( &project( &StubResolver::default() ), "11.0.2" ), factory );
	let outcomes = facade.environment_builder( &BTreeMap::new() ).unwrap().build().unwrap()
		.activate_recipes( &[ "org.example.Foo" ]).unwrap()
		.validate_all().unwrap();

	let invalid = outcomes[0].as_invalid().unwrap();
	assert_eq!( invalid.exception().unwrap().as_deref(), Some( "IllegalArgumentException" ));

}

#[test]
fn variant_outcomes_are_told_apart_by_case() {

	let recipe = facade_with_outcomes( UnknownOutcomePolicy::default(), tagged_outcomes )
		.environment_builder( &BTreeMap::new() ).unwrap().build().unwrap()
		.activate_recipes( &[ "org.example.Foo" ]).unwrap();

	let outcomes = recipe.validate_all().unwrap();

	assert_eq!( outcomes.len(), 2 );
	let Validated::Invalid( invalid ) = &outcomes[0] else { panic!( "Expected Invalid, found: {:#?}", outcomes[0] ) };
	assert_eq!( invalid.property().unwrap(), "include" );
	assert!( matches!( outcomes[1], Validated::Both( _ )));
	assert!( outcomes.iter().all(| outcome | outcome.reference().type_name() == VALIDATED ));

}

#[test]
fn unknown_variant_outcome_fails_when_configured() {

	let recipe = facade_with_outcomes( UnknownOutcomePolicy::Fail, tagged_outcomes )
		.environment_builder( &BTreeMap::new() ).unwrap().build().unwrap()
		.activate_recipes( &[ "org.example.Foo" ]).unwrap();

	match recipe.validate_all().unwrap_err().cause() {
		Cause::UnexpectedValue { found, .. } => assert!( found.contains( "`valid`" ), "{}", found ),
		cause => panic!( "Expected an unexpected value, found: {:#?}", cause ),
	}

}

#[test]
fn bare_outcomes_must_match_the_full_type_name() {

	let recipe = facade_with_outcomes( UnknownOutcomePolicy::Fail, | world | vec![
		world.object( "my:package/other#invalid", "include" ),
	])
		.environment_builder( &BTreeMap::new() ).unwrap().build().unwrap()
		.activate_recipes( &[ "org.example.Foo" ]).unwrap();

	match recipe.validate_all().unwrap_err().cause() {
		Cause::UnexpectedValue { found, .. } => assert!( found.contains( "my:package/other#invalid" ), "{}", found ),
		cause => panic!( "Expected an unexpected value, found: {:#?}", cause ),
	}

}
