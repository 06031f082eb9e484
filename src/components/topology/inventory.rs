use serde::Serialize;

use super::graph::TopologyGraph;
use super::types::Status;

/// Flat row for the equipment inventory table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
	/// Node id.
	pub id: String,
	/// Node label.
	pub name: String,
	/// Device type description.
	#[serde(rename = "type")]
	pub device_type: String,
	/// Connected, Warning or Disconnected.
	pub status: &'static str,
	/// Serial, else model, else `N/A`.
	pub serial_or_model: String,
}

/// Status wording used by the inventory table.
pub fn inventory_status(status: Status) -> &'static str {
	match status {
		Status::Online => "Connected",
		Status::Degraded => "Warning",
		Status::Offline => "Disconnected",
	}
}

/// One row per node, in graph order.
pub fn inventory_rows(graph: &TopologyGraph) -> Vec<InventoryRow> {
	graph
		.nodes()
		.iter()
		.map(|n| InventoryRow {
			id: n.id.clone(),
			name: n.label.clone(),
			device_type: n.kind.meta().description.to_string(),
			status: inventory_status(n.status),
			serial_or_model: n
				.attrs
				.serial
				.clone()
				.or_else(|| n.attrs.model.clone())
				.unwrap_or_else(|| "N/A".to_string()),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::fixtures::{graph, scenario};

	#[test]
	fn rows_translate_status_and_pick_serial_first() {
		let mut data = scenario();
		data.nodes[0].attrs.serial = Some("SN-0001".into());
		data.nodes[0].attrs.model = Some("MU-8".into());
		data.nodes[2].attrs.model = Some("OEU-4".into());
		let rows = inventory_rows(&graph(data));

		assert_eq!(rows.len(), 5);
		assert_eq!(rows[0].serial_or_model, "SN-0001");
		assert_eq!(rows[2].serial_or_model, "OEU-4");
		assert_eq!(rows[1].serial_or_model, "N/A");
		let statuses: Vec<_> = rows.iter().map(|r| r.status).collect();
		assert_eq!(statuses, ["Connected", "Connected", "Warning", "Connected", "Disconnected"]);
		assert_eq!(rows[2].device_type, "Optical Expansion Unit");
	}

	#[test]
	fn rows_serialize_with_table_field_names() {
		let rows = inventory_rows(&graph(scenario()));
		let json = serde_json::to_value(&rows[4]).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"id": "b2",
				"name": "b2",
				"type": "High-Power Remote Unit",
				"status": "Disconnected",
				"serialOrModel": "N/A",
			})
		);
	}
}
