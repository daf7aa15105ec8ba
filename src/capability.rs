use serde::Serialize;

/// One entry of the static allow-list the host expression engine consults
/// before routing a call from a restricted context.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OperationSpec {
    pub name: &'static str,
    pub restricted_safe: bool,
}

/// Every operation this component exposes. All of them are pure text
/// transformations, so none is excluded from restricted invocation.
pub(crate) const OPERATIONS: &[OperationSpec] = &[OperationSpec {
    name: "build",
    restricted_safe: true,
}];

pub(crate) fn operation(name: &str) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().find(|spec| spec.name == name)
}

pub(crate) fn allows_restricted_call(name: &str) -> bool {
    operation(name).is_some_and(|spec| spec.restricted_safe)
}
