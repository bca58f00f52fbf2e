//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Each registered tool gets a route that works out who is calling, then
//! hands the call to [`ToolRegistry::call_tool`].

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    RoleServer,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    service::RequestContext,
};

use super::registry::ToolRegistry;
use crate::core::session::CallerContext;

/// Server types that can tell who sent a request.
pub trait CallerResolver {
    fn caller(&self, request: &RequestContext<RoleServer>) -> CallerContext;
}

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: CallerResolver + Send + Sync + 'static,
{
    registry
        .handlers()
        .iter()
        .fold(ToolRouter::new(), |router, handler| {
            let name = handler.name();
            let registry = registry.clone();
            router.with_route(ToolRoute::new_dyn(
                handler.to_tool(),
                move |ctx: ToolCallContext<'_, S>| {
                    let registry = registry.clone();
                    let arguments = ctx.arguments.clone().unwrap_or_default();
                    let request = ctx.request_context();
                    let caller = ctx.service.caller(request);
                    let ct = request.ct.clone();
                    async move { Ok(registry.call_tool(name, arguments, &caller, &ct).await) }
                        .boxed()
                },
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientSettings;
    use crate::core::session::SessionRegistry;

    struct TestServer {}

    impl CallerResolver for TestServer {
        fn caller(&self, _request: &RequestContext<RoleServer>) -> CallerContext {
            CallerContext::new("test", "")
        }
    }

    fn test_registry() -> Arc<ToolRegistry> {
        let sessions = Arc::new(SessionRegistry::from_settings(ClientSettings::new(
            "https://10.0.0.5:5007",
        )));
        Arc::new(ToolRegistry::new(sessions))
    }

    #[test]
    fn test_registry_matches_router() {
        let registry = test_registry();
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(registry);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_router_tools_carry_annotations() {
        let router: ToolRouter<TestServer> = build_tool_router(test_registry());
        let tools = router.list_all();

        let delete = tools
            .iter()
            .find(|t| t.name == "delete_organization_by_id")
            .unwrap();
        let annotations = delete.annotations.as_ref().unwrap();
        assert_eq!(annotations.destructive_hint, Some(true));
        assert_eq!(annotations.read_only_hint, Some(false));

        let list = tools.iter().find(|t| t.name == "list_organizations").unwrap();
        assert_eq!(list.annotations.as_ref().unwrap().read_only_hint, Some(true));
    }
}
