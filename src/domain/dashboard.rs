//! Dashboard service value objects.
//!
//! These mirror the dashboard service's V1 schema: a dashboard group owns
//! dashboards, and a dashboard owns widgets whose data sources are
//! monitoring query bindings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Chart types the widget catalog uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    GroupBar,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetLayout {
    pub width: u32,
    pub height: u32,
    pub top: u32,
    pub left: u32,
    pub min_h: u32,
    pub min_w: u32,
}

/// A `{"value": ...}` wrapper, the shape the url-template variables take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableValue {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetApi {
    #[serde(rename = "type")]
    pub api_type: String,
    pub template_id: String,
    pub variables: Vec<BTreeMap<String, VariableValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetData {
    pub data_source: String,
    pub api: WidgetApi,
}

/// One dashboard widget: a title, a chart type, a grid position and a
/// monitoring query binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub widget_type: ChartType,
    pub description: String,
    pub layout: WidgetLayout,
    pub data: WidgetData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDashboardGroupDetails {
    pub display_name: String,
    pub description: String,
    pub compartment_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDashboardDetails {
    pub display_name: String,
    pub description: String,
    pub dashboard_group_id: String,
    pub schema_version: String,
    pub widgets: Vec<Widget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&ChartType::GroupBar).unwrap(),
            "\"GroupBar\""
        );
        assert_eq!(serde_json::to_string(&ChartType::Bar).unwrap(), "\"Bar\"");
    }

    #[test]
    fn test_layout_min_sizes_keep_their_casing() {
        let layout = WidgetLayout {
            width: 9,
            height: 6,
            top: 0,
            left: 9,
            min_h: 6,
            min_w: 9,
        };

        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["minH"], 6);
        assert_eq!(json["minW"], 9);
        assert_eq!(json["left"], 9);
    }
}
