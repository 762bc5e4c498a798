//! Filter option search.
//!
//! Filter widgets look up candidate values through one of several option
//! endpoints, chosen by the filter key.

use serde::{Deserialize, Serialize};

/// Filter key of the injector contract's injector filter.
pub const INJECTOR_CONTRACT_INJECTOR_FILTER_KEY: &str = "injector_contract_injector";

/// Injectors whose contracts target players rather than assets
/// (challenge, channel, email, manual, SMS).
pub const PLAYER_INJECTOR_IDS: [&str; 5] = [
    "49229430-b5b5-431f-ba5b-f36f599b0233",
    "8d932e36-353c-48fa-ba6f-86cb7b02ed19",
    "41b4dd55-5bd1-4614-98cd-9e3770753306",
    "6981a39d-e219-4016-a235-cf7747994abc",
    "e5aefbca-cf8f-4a57-9384-0503a8ffc22f",
];

/// Option endpoint a filter key searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Injectors,
    KillChainPhases,
    AttackPatterns,
    Tags,
    Scenarios,
    ScenarioCategories,
}

impl SearchTarget {
    pub fn from_filter_key(key: &str) -> Option<Self> {
        match key {
            INJECTOR_CONTRACT_INJECTOR_FILTER_KEY => Some(SearchTarget::Injectors),
            "injector_contract_kill_chain_phases"
            | "scenario_kill_chain_phases"
            | "exercise_kill_chain_phases"
            | "inject_kill_chain_phases" => Some(SearchTarget::KillChainPhases),
            "payload_attack_patterns" => Some(SearchTarget::AttackPatterns),
            "scenario_tags" | "exercise_tags" | "inject_tags" => Some(SearchTarget::Tags),
            "exercise_scenario" => Some(SearchTarget::Scenarios),
            "scenario_category" => Some(SearchTarget::ScenarioCategories),
            _ => None,
        }
    }

    pub fn uri(&self) -> &'static str {
        match self {
            SearchTarget::Injectors => "/api/injectors/options",
            SearchTarget::KillChainPhases => "/api/kill_chain_phases/options",
            SearchTarget::AttackPatterns => "/api/attack_patterns/options",
            SearchTarget::Tags => "/api/tags/options",
            SearchTarget::Scenarios => "/api/scenarios/options",
            SearchTarget::ScenarioCategories => "/api/scenarios/category/options",
        }
    }

    /// Category labels are translation keys, not display text.
    pub fn translates_labels(&self) -> bool {
        matches!(self, SearchTarget::ScenarioCategories)
    }

    pub(crate) fn search_uri(&self, search: &str) -> String {
        format!("{}?searchText={}", self.uri(), urlencoding::encode(search))
    }
}

/// A selectable filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOption {
    pub id: String,
    pub label: String,
}

/// A multi-value filter assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterValues {
    pub key: &'static str,
    pub values: Vec<String>,
}

/// The "players only" switch on injector contracts: enabled restricts the
/// injector filter to [`PLAYER_INJECTOR_IDS`], disabled clears it.
pub fn player_injector_filter(enabled: bool) -> FilterValues {
    let values = if enabled {
        PLAYER_INJECTOR_IDS.iter().map(|id| id.to_string()).collect()
    } else {
        Vec::new()
    };
    FilterValues {
        key: INJECTOR_CONTRACT_INJECTOR_FILTER_KEY,
        values,
    }
}

/// Platforms a scenario can target, in display order.
pub const SCENARIO_PLATFORMS: [&str; 8] =
    ["Linux", "Windows", "MacOS", "Container", "Service", "Generic", "Internal", "Unknow"];

/// A property the server allows filtering on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub schema_property_name: String,
    #[serde(default)]
    pub schema_property_type_array: bool,
    #[serde(default)]
    pub schema_property_values: Option<Vec<String>>,
    #[serde(default)]
    pub schema_property_has_dynamic_value: bool,
    pub schema_property_type: String,
}

impl PropertySchema {
    fn string(name: impl Into<String>, type_array: bool, values: Option<Vec<String>>, has_dynamic_value: bool) -> Self {
        Self {
            schema_property_name: name.into(),
            schema_property_type_array: type_array,
            schema_property_values: values,
            schema_property_has_dynamic_value: has_dynamic_value,
            schema_property_type: "string".to_string(),
        }
    }
}

/// Entity class name behind a snake_case entity prefix
/// (`injector_contract` is `InjectorContract`).
pub fn entity_class(entity_prefix: &str) -> String {
    entity_prefix
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Append the properties the server does not describe itself but which the
/// requested filter names rely on: kill chain phases, scenario platforms and
/// inject type.
pub fn augment_property_schemas(
    entity_prefix: &str,
    filter_names: &[String],
    mut schemas: Vec<PropertySchema>,
) -> Vec<PropertySchema> {
    let wants = |suffix: &str| filter_names.iter().any(|name| name.ends_with(suffix));
    if wants("_kill_chain_phases") {
        schemas.push(PropertySchema::string(
            format!("{entity_prefix}_kill_chain_phases"),
            true,
            Some(Vec::new()),
            true,
        ));
    }
    if wants("scenario_platforms") {
        let platforms = SCENARIO_PLATFORMS.iter().map(|p| p.to_string()).collect();
        schemas.push(PropertySchema::string("scenario_platforms", true, Some(platforms), false));
    }
    if wants("inject_type") {
        schemas.push(PropertySchema::string("inject_type", false, None, false));
    }
    schemas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_chain_keys_share_one_endpoint() {
        for key in [
            "injector_contract_kill_chain_phases",
            "scenario_kill_chain_phases",
            "exercise_kill_chain_phases",
            "inject_kill_chain_phases",
        ] {
            assert_eq!(SearchTarget::from_filter_key(key), Some(SearchTarget::KillChainPhases));
        }
    }

    #[test]
    fn tag_keys_share_one_endpoint() {
        for key in ["scenario_tags", "exercise_tags", "inject_tags"] {
            assert_eq!(SearchTarget::from_filter_key(key).map(|t| t.uri()), Some("/api/tags/options"));
        }
    }

    #[test]
    fn unknown_key_has_no_target() {
        assert_eq!(SearchTarget::from_filter_key("asset_name"), None);
        assert_eq!(SearchTarget::from_filter_key(""), None);
    }

    #[test]
    fn only_categories_translate() {
        assert!(SearchTarget::ScenarioCategories.translates_labels());
        assert!(!SearchTarget::Tags.translates_labels());
    }

    #[test]
    fn search_text_is_encoded() {
        assert_eq!(
            SearchTarget::Tags.search_uri("red team & co"),
            "/api/tags/options?searchText=red%20team%20%26%20co"
        );
        assert_eq!(SearchTarget::Injectors.search_uri(""), "/api/injectors/options?searchText=");
    }

    #[test]
    fn player_filter_toggles_fixed_ids() {
        let on = player_injector_filter(true);
        assert_eq!(on.key, "injector_contract_injector");
        assert_eq!(on.values.len(), 5);
        assert!(player_injector_filter(false).values.is_empty());
    }

    fn names(filters: &[&str]) -> Vec<String> {
        filters.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn entity_class_is_pascal_case() {
        assert_eq!(entity_class("injector_contract"), "InjectorContract");
        assert_eq!(entity_class("scenario"), "Scenario");
        assert_eq!(entity_class("attack__pattern_"), "AttackPattern");
    }

    #[test]
    fn kill_chain_filter_adds_prefixed_dynamic_property() {
        let schemas = augment_property_schemas("scenario", &names(&["scenario_kill_chain_phases"]), Vec::new());
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].schema_property_name, "scenario_kill_chain_phases");
        assert!(schemas[0].schema_property_type_array);
        assert!(schemas[0].schema_property_has_dynamic_value);
        assert_eq!(schemas[0].schema_property_values, Some(Vec::new()));
    }

    #[test]
    fn platform_filter_adds_fixed_values() {
        let schemas = augment_property_schemas("scenario", &names(&["scenario_platforms"]), Vec::new());
        assert_eq!(schemas[0].schema_property_name, "scenario_platforms");
        assert!(!schemas[0].schema_property_has_dynamic_value);
        let values = schemas[0].schema_property_values.clone().unwrap();
        assert_eq!(values.first().map(String::as_str), Some("Linux"));
        assert_eq!(values.len(), 8);
    }

    #[test]
    fn inject_type_is_single_valued_without_values() {
        let server = vec![PropertySchema::string("inject_title", false, None, false)];
        let schemas = augment_property_schemas("inject", &names(&["inject_title", "inject_type"]), server);
        let added: Vec<&str> = schemas.iter().map(|s| s.schema_property_name.as_str()).collect();
        assert_eq!(added, vec!["inject_title", "inject_type"]);
        assert!(!schemas[1].schema_property_type_array);
        assert_eq!(schemas[1].schema_property_values, None);
    }

    #[test]
    fn plain_filters_add_nothing() {
        assert!(augment_property_schemas("scenario", &names(&["scenario_name"]), Vec::new()).is_empty());
    }
}
