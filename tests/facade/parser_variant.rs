use rewrite_facade::concepts ;
use rewrite_facade::proxy::Proxy ;
use crate::stub_boundary::{ facade, project, task, CallLog, StubFactory, StubResolver };

#[test]
fn modern_runtime_requests_modern_java_parser() {

	let log = CallLog::default();
	let facade = facade( task( &project( &StubResolver::default() ), "11.0.2" ), StubFactory::engine( &log ));

	let parser = facade.java_parser().unwrap();

	assert!( log.contains( &format!( "load {}", concepts::JAVA_11_PARSER )));
	assert!( !log.entries().iter().any(| entry | entry.contains( concepts::JAVA_8_PARSER )));
	assert_eq!( parser.reference().type_name(), concepts::JAVA_11_PARSER );

}

#[test]
fn legacy_runtime_requests_legacy_java_parser() {

	let log = CallLog::default();
	let facade = facade( task( &project( &StubResolver::default() ), "1.8.0_292" ), StubFactory::engine( &log ));

	let parser = facade.java_parser_builder().unwrap()
		.log_compilation_warnings_and_errors( true ).unwrap()
		.classpath( &[] ).unwrap()
		.build().unwrap();

	assert!( log.contains( &format!( "{}::builder", concepts::JAVA_8_PARSER )));
	assert!( !log.entries().iter().any(| entry | entry.contains( concepts::JAVA_11_PARSER )));
	assert_eq!( parser.reference().type_name(), concepts::JAVA_8_PARSER );

}

#[test]
fn java_parser_variant_is_chosen_per_call() {

	use std::sync::{ Arc, Mutex };
	use rewrite_facade::{ HostRuntime, TaskContext };

	struct SwitchingRuntime( Arc<Mutex<String>> );
	impl HostRuntime for SwitchingRuntime {
		fn version( &self ) -> String { self.0.lock().unwrap().clone() }
	}

	let log = CallLog::default();
	let version = Arc::new( Mutex::new( "1.8.0".to_string() ));
	let task = TaskContext::new( "Run", project( &StubResolver::default() ))
		.with_host_runtime( SwitchingRuntime( Arc::clone( &version )));
	let facade = facade( task, StubFactory::engine( &log ));

	facade.java_parser_builder().unwrap();
	*version.lock().unwrap() = "17.0.1".to_string();
	facade.java_parser_builder().unwrap();

	assert_eq!( log.count( &format!( "{}::builder", concepts::JAVA_8_PARSER )), 1 );
	assert_eq!( log.count( &format!( "{}::builder", concepts::JAVA_11_PARSER )), 1 );

}

#[test]
fn other_parsers_do_not_depend_on_runtime() {

	for runtime in [ "1.8.0", "11.0.2" ] {
		let log = CallLog::default();
		let facade = facade( task( &project( &StubResolver::default() ), runtime ), StubFactory::engine( &log ));

		assert_eq!( facade.yaml_parser().unwrap().reference().type_name(), concepts::YAML_PARSER );
		assert_eq!( facade.xml_parser().unwrap().reference().type_name(), concepts::XML_PARSER );
		assert_eq!( facade.properties_parser().unwrap().reference().type_name(), concepts::PROPERTIES_PARSER );
	}

}
