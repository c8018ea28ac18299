pub mod math;
pub mod text;

use packrpc_service::{RpcFunctionBinder, RpcHandlerRegistry};

/// Binds every example handler under its public method name.
pub struct ExampleService;

impl RpcFunctionBinder for ExampleService {
    fn bind(&self, registry: &mut RpcHandlerRegistry) {
        registry.bind(math::ADD, math::add);
        registry.bind(math::DIVIDE, math::divide);
        registry.bind(math::SUM, math::sum);
        registry.bind(text::PAIR, text::pair);
        registry.bind(text::ECHO, text::echo);
        registry.bind(NOOP, noop);
    }
}

pub const NOOP: &str = "noop";

pub async fn noop() {}
