#[allow( dead_code )]
mod components {

	use std::path::PathBuf ;
	use rewrite_facade::{ Component, Dispatcher, Engine, Kind, ObjectRef, Target, Value, WasmBoundary };

	pub const INTERFACE: &str = "my:package/example" ;

	/// Exports `get-value: func() -> u32` returning 42 and `explode: func()` that traps.
	pub const EXAMPLE: &str = r#"(component
		(core module $m
			(func (export "f") (result i32) i32.const 42)
			(func (export "trap") unreachable)
		)
		(core instance $i (instantiate $m))
		(func $f (result u32) (canon lift (core func $i "f")))
		(func $trap (canon lift (core func $i "trap")))
		(instance $inst
			(export "get-value" (func $f))
			(export "explode" (func $trap))
		)
		(export "my:package/example" (instance $inst))
	)"# ;

	pub const THINGS: &str = "my:package/things" ;
	pub const THING: &str = "my:package/things#thing" ;

	/// Exports resource `thing` (its rep is the constructor argument) with
	/// - `[constructor]thing( value: s64 )`
	/// - `[method]thing.get() -> s64`
	/// - `[method]thing.check() -> result<s64, string>`, failing with "negative" for negative values
	/// - `[static]thing.sum( a: borrow<thing>, b: borrow<thing> ) -> s64`
	/// - `[static]thing.eat( t: own<thing> )` and `[static]thing.maybe-eat( t: option<own<thing>> )`
	pub const RESOURCES: &str = r#"(component
		(component $things
			(type $thing' (resource (rep i32)))
			(export $thing "thing" (type $thing'))
			(core func $new (canon resource.new $thing))
			(core module $m
				(import "" "new" (func $new (param i32) (result i32)))
				(memory (export "mem") 1)
				(data (i32.const 0) "\01\00\00\00\00\00\00\00\20\00\00\00\08\00\00\00")
				(data (i32.const 32) "negative")
				(func (export "ctor") (param i64) (result i32)
					local.get 0
					i32.wrap_i64
					call $new
				)
				(func (export "get") (param i32) (result i64)
					local.get 0
					i64.extend_i32_s
				)
				(func (export "check") (param i32) (result i32)
					local.get 0
					i32.const 0
					i32.lt_s
					if (result i32)
						i32.const 0
					else
						i32.const 16
						i32.const 0
						i32.store8
						i32.const 24
						local.get 0
						i64.extend_i32_s
						i64.store
						i32.const 16
					end
				)
				(func (export "sum") (param i32 i32) (result i64)
					local.get 0
					local.get 1
					i32.add
					i64.extend_i32_s
				)
				(func (export "eat") (param i32))
				(func (export "maybe-eat") (param i32 i32))
			)
			(core instance $i (instantiate $m (with "" (instance (export "new" (func $new))))))
			(func (export "[constructor]thing") (param "value" s64) (result (own $thing))
				(canon lift (core func $i "ctor"))
			)
			(func (export "[method]thing.get") (param "self" (borrow $thing)) (result s64)
				(canon lift (core func $i "get"))
			)
			(func (export "[method]thing.check") (param "self" (borrow $thing)) (result (result s64 (error string)))
				(canon lift (core func $i "check") (memory (core memory $i "mem")))
			)
			(func (export "[static]thing.sum") (param "a" (borrow $thing)) (param "b" (borrow $thing)) (result s64)
				(canon lift (core func $i "sum"))
			)
			(func (export "[static]thing.eat") (param "t" (own $thing))
				(canon lift (core func $i "eat"))
			)
			(func (export "[static]thing.maybe-eat") (param "t" (option (own $thing)))
				(canon lift (core func $i "maybe-eat"))
			)
		)
		(instance $inst (instantiate $things))
		(export "my:package/things" (instance $inst))
	)"# ;

	pub const REPORTER: &str = "my:package/reporter" ;
	pub const REPORTED: &str = "bad.yml could not be parsed" ;

	/// Exports `report: func( callback: u32 )`, which passes [`REPORTED`] to
	/// the host through the error callback bridge.
	pub const REPORTING: &str = r#"(component
		(import "openrewrite:host/callbacks" (instance $host
			(export "on-error" (func (param "callback" u32) (param "message" string)))
		))
		(core module $memory-module
			(memory (export "mem") 1)
			(data (i32.const 0) "bad.yml could not be parsed")
		)
		(core instance $memory (instantiate $memory-module))
		(core func $on-error (canon lower (func $host "on-error") (memory (core memory $memory "mem"))))
		(core module $m
			(import "host" "on-error" (func $on-error (param i32 i32 i32)))
			(func (export "report") (param i32)
				local.get 0
				i32.const 0
				i32.const 27
				call $on-error
			)
		)
		(core instance $i (instantiate $m (with "host" (instance (export "on-error" (func $on-error))))))
		(func $report (param "callback" u32) (canon lift (core func $i "report")))
		(instance $inst (export "report" (func $report)))
		(export "my:package/reporter" (instance $inst))
	)"# ;

	/// Imports the host error callback bridge without exporting anything.
	pub const CALLBACK_IMPORT: &str = r#"(component
		(import "openrewrite:host/callbacks" (instance
			(export "on-error" (func (param "callback" u32) (param "message" string)))
		))
	)"# ;

	/// Imports an interface the boundary does not provide.
	pub const FOREIGN_IMPORT: &str = r#"(component
		(import "other:package/host" (instance
			(export "f" (func))
		))
	)"# ;

	pub fn component( engine: &Engine, source: &str ) -> Component {
		Component::new( engine, source ).expect( "Failed to compile component" )
	}

	pub fn dispatcher( name: &str, source: &str ) -> Dispatcher {
		let engine = Engine::default();
		let boundary = WasmBoundary::from_components( &engine, [( PathBuf::from( name ), component( &engine, source ))])
			.expect( "Failed to build boundary" );
		Dispatcher::new( Box::new( boundary ))
	}

	pub fn example_dispatcher() -> Dispatcher { dispatcher( "example.wasm", EXAMPLE ) }
	pub fn resource_dispatcher() -> Dispatcher { dispatcher( "things.wasm", RESOURCES ) }

	/// Constructs a `thing` holding `value`.
	pub fn thing( dispatcher: &Dispatcher, value: i64 ) -> ObjectRef {
		let concept = dispatcher.load_concept( THING ).expect( "Failed to load thing" );
		match dispatcher.invoke( Target::Constructor( &concept ), &[ Kind::Integer ], vec![ Value::Integer( value )]) {
			Ok( Value::Object( object )) => object,
			other => panic!( "Expected an object, found: {:#?}", other ),
		}
	}

}
