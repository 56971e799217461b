use crate::domain::json::Object;

/// One tick's worth of report data.
///
/// Built fresh each tick and dropped once the POST attempt is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub instance_id: String,
    pub product_version: String,
    pub environment_version: String,
    pub live_metric: i64,
}

impl ReportSnapshot {
    pub const INSTANCE_ID: &'static str = "instance_id";
    pub const PRODUCT_VERSION: &'static str = "plugin_version";
    pub const ENVIRONMENT_VERSION: &'static str = "server_version";
    pub const LIVE_METRIC: &'static str = "online_players";

    /// Wire form, keys in the collector's expected order
    pub fn to_object(&self) -> Object {
        let mut object = Object::with_capacity(4);
        object.insert(Self::INSTANCE_ID, self.instance_id.as_str());
        object.insert(Self::PRODUCT_VERSION, self.product_version.as_str());
        object.insert(Self::ENVIRONMENT_VERSION, self.environment_version.as_str());
        object.insert(Self::LIVE_METRIC, self.live_metric);
        object
    }
}
