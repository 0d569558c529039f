//! Property (delivery configuration) endpoints.
//!
//! A property export touches several PAPI surfaces: search by name, the
//! property and its latest version, the rule tree, group and product
//! lookups for display names, the version's hostnames, and per-edge-
//! hostname detail. Rule criteria and behaviors stay opaque JSON; the
//! exporter re-serializes them into snippet files without interpreting
//! them.

use crate::client::EdgeClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A property and the ids needed for follow-up calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property id (`prp_` prefixed)
    pub property_id: String,
    /// Display name
    pub property_name: String,
    /// Owning contract
    pub contract_id: String,
    /// Owning group
    pub group_id: String,
    /// Highest existing version number
    pub latest_version: u32,
}

/// One property version's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyVersion {
    /// Version number
    pub property_version: u32,
    /// Product the version runs on
    pub product_id: String,
    /// Rule format frozen for the version
    pub rule_format: String,
}

/// A group id/name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group id (`grp_` prefixed)
    pub group_id: String,
    /// Display name
    pub group_name: String,
}

/// A product id/name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Product id (`prd_` prefixed)
    pub product_id: String,
    /// Display name
    pub product_name: String,
}

/// One hostname mapping on a property version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostname {
    /// Hostname traffic arrives on
    pub cname_from: String,
    /// Edge hostname it maps to
    pub cname_to: String,
    /// Id of the edge hostname
    pub edge_hostname_id: String,
    /// Certificate provisioning mode, when the API reports one
    #[serde(default)]
    pub cert_provisioning_type: Option<String>,
}

/// Edge hostname detail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeHostname {
    /// Id (`ehn_` prefixed)
    pub edge_hostname_id: String,
    /// Full edge domain, e.g. `www.example.com.edgesuite.net`
    pub domain: String,
    /// STANDARD-TLS or ENHANCED-TLS
    pub security_type: String,
    /// IPV4 or IPV6_COMPLIANCE
    pub ip_version_behavior: String,
    /// Certificate slot (enhanced TLS only)
    #[serde(default)]
    pub slot_number: Option<u32>,
}

/// The rule tree of one property version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTree {
    /// Rule format the tree was fetched in
    pub rule_format: String,
    /// The default (top-level) rule
    #[serde(rename = "rules")]
    pub rule: Rule,
}

/// One rule. Children recurse; criteria and behaviors stay opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Rule name as shown in the UI
    pub name: String,
    /// Nested rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Rule>,
    /// Behavior objects, unmodified
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub behaviors: Vec<serde_json::Value>,
    /// Criteria objects, unmodified
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<serde_json::Value>,
    /// "all" or "any", when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_must_satisfy: Option<String>,
    /// Free-form comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Rule options (top-level rule only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

/// Property surface of the management API.
pub trait PropertyApi: Send + Sync {
    /// Find a property by display name.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when no property carries the name.
    fn find_property(&self, name: &str) -> Result<Property>;

    /// Fetch one version's metadata.
    fn get_version(&self, property: &Property, version: u32) -> Result<PropertyVersion>;

    /// Fetch one version's rule tree.
    fn get_rule_tree(&self, property: &Property, version: u32) -> Result<RuleTree>;

    /// Resolve a group id to its display name.
    fn find_group(&self, group_id: &str) -> Result<Group>;

    /// Resolve a product id to its display name.
    fn find_product(&self, contract_id: &str, product_id: &str) -> Result<Product>;

    /// List a version's hostname mappings.
    fn list_hostnames(&self, property: &Property, version: u32) -> Result<Vec<Hostname>>;

    /// Fetch edge hostname detail.
    fn get_edge_hostname(&self, edge_hostname_id: &str) -> Result<EdgeHostname>;

    /// Notification emails of the latest staging activation.
    ///
    /// Returns an empty list when the property was never activated.
    fn activation_emails(&self, property: &Property) -> Result<Vec<String>>;
}

impl EdgeClient {
    fn property_query(property: &Property) -> String {
        format!(
            "contractId={}&groupId={}",
            property.contract_id, property.group_id
        )
    }
}

impl PropertyApi for EdgeClient {
    fn find_property(&self, name: &str) -> Result<Property> {
        let path = format!("/papi/v1/search?propertyName={name}");
        let response: WireSearch = self.get_json(&path)?;
        let hit = response
            .versions
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                kind: "property",
                name: name.to_string(),
            })?;

        let path = format!(
            "/papi/v1/properties/{}?contractId={}&groupId={}",
            hit.property_id, hit.contract_id, hit.group_id
        );
        let response: WireProperties = self.get_json(&path)?;
        let item = response
            .properties
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                kind: "property",
                name: name.to_string(),
            })?;
        Ok(Property {
            property_id: item.property_id,
            property_name: item.property_name,
            contract_id: hit.contract_id,
            group_id: hit.group_id,
            latest_version: item.latest_version,
        })
    }

    fn get_version(&self, property: &Property, version: u32) -> Result<PropertyVersion> {
        let path = format!(
            "/papi/v1/properties/{}/versions/{version}?{}",
            property.property_id,
            Self::property_query(property)
        );
        let response: WireVersions = self.get_json(&path)?;
        let item = response
            .versions
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound {
                kind: "property version",
                name: format!("{} v{version}", property.property_name),
            })?;
        Ok(PropertyVersion {
            property_version: item.property_version,
            product_id: item.product_id,
            rule_format: item.rule_format,
        })
    }

    fn get_rule_tree(&self, property: &Property, version: u32) -> Result<RuleTree> {
        let path = format!(
            "/papi/v1/properties/{}/versions/{version}/rules?{}",
            property.property_id,
            Self::property_query(property)
        );
        self.get_json(&path)
    }

    fn find_group(&self, group_id: &str) -> Result<Group> {
        let response: WireGroups = self.get_json("/papi/v1/groups")?;
        response
            .groups
            .items
            .into_iter()
            .find(|g| g.group_id == group_id)
            .map(|g| Group {
                group_id: g.group_id,
                group_name: g.group_name,
            })
            .ok_or_else(|| Error::NotFound {
                kind: "group",
                name: group_id.to_string(),
            })
    }

    fn find_product(&self, contract_id: &str, product_id: &str) -> Result<Product> {
        let path = format!("/papi/v1/products?contractId={contract_id}");
        let response: WireProducts = self.get_json(&path)?;
        response
            .products
            .items
            .into_iter()
            .find(|p| p.product_id == product_id)
            .map(|p| Product {
                product_id: p.product_id,
                product_name: p.product_name,
            })
            .ok_or_else(|| Error::NotFound {
                kind: "product",
                name: product_id.to_string(),
            })
    }

    fn list_hostnames(&self, property: &Property, version: u32) -> Result<Vec<Hostname>> {
        let path = format!(
            "/papi/v1/properties/{}/versions/{version}/hostnames?{}",
            property.property_id,
            Self::property_query(property)
        );
        let response: WireHostnames = self.get_json(&path)?;
        Ok(response.hostnames.items)
    }

    fn get_edge_hostname(&self, edge_hostname_id: &str) -> Result<EdgeHostname> {
        let path = format!("/hapi/v1/edge-hostnames/{edge_hostname_id}");
        self.get_json(&path).map_err(|err| match err {
            Error::Http {
                status: Some(404), ..
            } => Error::NotFound {
                kind: "edge hostname",
                name: edge_hostname_id.to_string(),
            },
            other => other,
        })
    }

    fn activation_emails(&self, property: &Property) -> Result<Vec<String>> {
        let path = format!(
            "/papi/v1/properties/{}/activations?{}",
            property.property_id,
            Self::property_query(property)
        );
        let response: WireActivations = self.get_json(&path)?;
        Ok(response
            .activations
            .items
            .into_iter()
            .find(|a| a.network == "STAGING")
            .map(|a| a.notify_emails)
            .unwrap_or_default())
    }
}

// =============================================================================
// API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct WireSearch {
    versions: WireSearchItems,
}

#[derive(Debug, Deserialize)]
struct WireSearchItems {
    items: Vec<WireSearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSearchHit {
    property_id: String,
    contract_id: String,
    group_id: String,
}

#[derive(Debug, Deserialize)]
struct WireProperties {
    properties: WirePropertyItems,
}

#[derive(Debug, Deserialize)]
struct WirePropertyItems {
    items: Vec<WireProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProperty {
    property_id: String,
    property_name: String,
    latest_version: u32,
}

#[derive(Debug, Deserialize)]
struct WireVersions {
    versions: WireVersionItems,
}

#[derive(Debug, Deserialize)]
struct WireVersionItems {
    items: Vec<WireVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVersion {
    property_version: u32,
    product_id: String,
    rule_format: String,
}

#[derive(Debug, Deserialize)]
struct WireGroups {
    groups: WireGroupItems,
}

#[derive(Debug, Deserialize)]
struct WireGroupItems {
    items: Vec<WireGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGroup {
    group_id: String,
    group_name: String,
}

#[derive(Debug, Deserialize)]
struct WireProducts {
    products: WireProductItems,
}

#[derive(Debug, Deserialize)]
struct WireProductItems {
    items: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProduct {
    product_id: String,
    product_name: String,
}

#[derive(Debug, Deserialize)]
struct WireHostnames {
    hostnames: WireHostnameItems,
}

#[derive(Debug, Deserialize)]
struct WireHostnameItems {
    items: Vec<Hostname>,
}

#[derive(Debug, Deserialize)]
struct WireActivations {
    activations: WireActivationItems,
}

#[derive(Debug, Deserialize)]
struct WireActivationItems {
    items: Vec<WireActivation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireActivation {
    network: String,
    #[serde(default)]
    notify_emails: Vec<String>,
}

// =============================================================================
// Mock
// =============================================================================

/// In-memory property API for tests.
#[derive(Debug, Clone, Default)]
pub struct MockPapi {
    properties: Arc<Mutex<HashMap<String, Property>>>,
    versions: Arc<Mutex<HashMap<String, PropertyVersion>>>,
    rule_trees: Arc<Mutex<HashMap<String, RuleTree>>>,
    groups: Arc<Mutex<HashMap<String, Group>>>,
    products: Arc<Mutex<HashMap<String, Product>>>,
    hostnames: Arc<Mutex<HashMap<String, Vec<Hostname>>>>,
    edge_hostnames: Arc<Mutex<HashMap<String, EdgeHostname>>>,
    emails: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl MockPapi {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property, keyed by display name.
    pub fn add_property(&mut self, property: Property) {
        let mut properties = self.properties.lock().unwrap();
        properties.insert(property.property_name.clone(), property);
    }

    /// Register version metadata for a property id.
    pub fn add_version(&mut self, property_id: &str, version: PropertyVersion) {
        let mut versions = self.versions.lock().unwrap();
        versions.insert(property_id.to_string(), version);
    }

    /// Register a rule tree for a property id.
    pub fn add_rule_tree(&mut self, property_id: &str, tree: RuleTree) {
        let mut rule_trees = self.rule_trees.lock().unwrap();
        rule_trees.insert(property_id.to_string(), tree);
    }

    /// Register a group.
    pub fn add_group(&mut self, group: Group) {
        let mut groups = self.groups.lock().unwrap();
        groups.insert(group.group_id.clone(), group);
    }

    /// Register a product.
    pub fn add_product(&mut self, product: Product) {
        let mut products = self.products.lock().unwrap();
        products.insert(product.product_id.clone(), product);
    }

    /// Register a version's hostnames for a property id.
    pub fn add_hostnames(&mut self, property_id: &str, hostnames: Vec<Hostname>) {
        let mut map = self.hostnames.lock().unwrap();
        map.insert(property_id.to_string(), hostnames);
    }

    /// Register edge hostname detail.
    pub fn add_edge_hostname(&mut self, edge_hostname: EdgeHostname) {
        let mut map = self.edge_hostnames.lock().unwrap();
        map.insert(edge_hostname.edge_hostname_id.clone(), edge_hostname);
    }

    /// Register staging activation emails for a property id.
    pub fn add_emails(&mut self, property_id: &str, emails: Vec<String>) {
        let mut map = self.emails.lock().unwrap();
        map.insert(property_id.to_string(), emails);
    }
}

impl PropertyApi for MockPapi {
    fn find_property(&self, name: &str) -> Result<Property> {
        let properties = self.properties.lock().unwrap();
        properties.get(name).cloned().ok_or_else(|| Error::NotFound {
            kind: "property",
            name: name.to_string(),
        })
    }

    fn get_version(&self, property: &Property, _version: u32) -> Result<PropertyVersion> {
        let versions = self.versions.lock().unwrap();
        versions
            .get(&property.property_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "property version",
                name: property.property_name.clone(),
            })
    }

    fn get_rule_tree(&self, property: &Property, _version: u32) -> Result<RuleTree> {
        let rule_trees = self.rule_trees.lock().unwrap();
        rule_trees
            .get(&property.property_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "rule tree",
                name: property.property_name.clone(),
            })
    }

    fn find_group(&self, group_id: &str) -> Result<Group> {
        let groups = self.groups.lock().unwrap();
        groups.get(group_id).cloned().ok_or_else(|| Error::NotFound {
            kind: "group",
            name: group_id.to_string(),
        })
    }

    fn find_product(&self, _contract_id: &str, product_id: &str) -> Result<Product> {
        let products = self.products.lock().unwrap();
        products
            .get(product_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "product",
                name: product_id.to_string(),
            })
    }

    fn list_hostnames(&self, property: &Property, _version: u32) -> Result<Vec<Hostname>> {
        let hostnames = self.hostnames.lock().unwrap();
        Ok(hostnames
            .get(&property.property_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_edge_hostname(&self, edge_hostname_id: &str) -> Result<EdgeHostname> {
        let edge_hostnames = self.edge_hostnames.lock().unwrap();
        edge_hostnames
            .get(edge_hostname_id)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                kind: "edge hostname",
                name: edge_hostname_id.to_string(),
            })
    }

    fn activation_emails(&self, property: &Property) -> Result<Vec<String>> {
        let emails = self.emails.lock().unwrap();
        Ok(emails
            .get(&property.property_id)
            .cloned()
            .unwrap_or_default())
    }
}
