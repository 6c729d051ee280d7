use std::error::Error ;
use rewrite_facade::{ BoundaryFailure, Cause, Target, Value };
use crate::components::{ example_dispatcher, resource_dispatcher, thing, INTERFACE, THING };

#[test]
fn trap_is_a_dispatch_error() {

	let dispatcher = example_dispatcher();
	let concept = dispatcher.load_concept( INTERFACE ).unwrap();

	match dispatcher.invoke( Target::Static( &concept, "explode" ), &[], vec![] ) {
		Err( err ) => {
			assert!( matches!( err.cause(), Cause::Trap( _ )), "{:?}", err );
			assert_eq!( err.operation(), format!( "{}::explode", INTERFACE ));
		},
		Ok( value ) => panic!( "Expected a trap, found: {:#?}", value ),
	}

}

#[test]
fn error_result_is_a_boundary_side_exception() {

	let dispatcher = resource_dispatcher();
	let negative = thing( &dispatcher, -1 );

	let err = dispatcher.invoke( Target::Method( &negative, "check" ), &[], vec![] ).unwrap_err();

	assert_eq!( err.operation(), format!( "{}.check", THING ));
	match err.cause() {
		Cause::Raised( failure ) => assert_eq!( failure.message(), "negative" ),
		cause => panic!( "Expected a boundary-side exception, found: {:#?}", cause ),
	}
	let failure = err.source()
		.and_then(| cause | cause.source() )
		.and_then(| source | source.downcast_ref::<BoundaryFailure>() );
	assert_eq!( failure.map( BoundaryFailure::message ), Some( "negative" ));

}

#[test]
fn ok_result_is_unwrapped() {

	let dispatcher = resource_dispatcher();
	let seven = thing( &dispatcher, 7 );

	assert_eq!( dispatcher.invoke( Target::Method( &seven, "check" ), &[], vec![] ).unwrap(), Value::Integer( 7 ));

}
