use std::fmt;

use serde::{Deserialize, Serialize};

/// Operational state of a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	/// Device is up and reporting.
	Online,
	/// Device is up with active warnings.
	Degraded,
	/// Device is unreachable.
	Offline,
}

impl Status {
	/// Every status, in legend order.
	pub const ALL: [Status; 3] = [Status::Online, Status::Degraded, Status::Offline];

	/// Lowercase name used by filters and tooltips.
	pub fn as_str(self) -> &'static str {
		match self {
			Status::Online => "online",
			Status::Degraded => "degraded",
			Status::Offline => "offline",
		}
	}

	/// Case-insensitive lookup by name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|s| s.as_str().eq_ignore_ascii_case(name.trim()))
	}

	/// Higher is worse. Used to pick the color of a link between two devices.
	pub fn severity(self) -> u8 {
		match self {
			Status::Online => 0,
			Status::Degraded => 1,
			Status::Offline => 2,
		}
	}

	/// Marker and link color.
	pub fn color(self) -> &'static str {
		match self {
			Status::Online => "#22c55e",
			Status::Degraded => "#f59e0b",
			Status::Offline => "#ef4444",
		}
	}

	/// The worse of two statuses.
	pub fn worst(self, other: Status) -> Status {
		if other.severity() > self.severity() {
			other
		} else {
			self
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Position of a device class in the distribution tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
	/// Signal source, root of a tree.
	HeadEnd,
	/// Fans a head-end's signal out to remotes.
	Distribution,
	/// Leaf radio unit.
	Remote,
}

/// Transmit power class of a remote unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerClass {
	/// Low power, small coverage.
	Low,
	/// Mid power.
	Mid,
	/// High power, largest coverage.
	High,
}

/// Fixed display metadata for a [`DeviceType`].
#[derive(Debug)]
pub struct TypeMeta {
	/// Short label, also the value the type filter matches against.
	pub label: &'static str,
	/// Long description, searchable.
	pub description: &'static str,
	/// Product family.
	pub family: &'static str,
	/// Tree tier.
	pub tier: Tier,
	/// Glyph fill color.
	pub color: &'static str,
	/// Power class, remote units only.
	pub power: Option<PowerClass>,
}

/// The closed set of device classes in a topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
	/// Master unit, interfaces base stations.
	#[serde(rename = "MU")]
	MasterUnit,
	/// Head-end unit, conditions RF for the optical network.
	#[serde(rename = "HEU")]
	HeadEndUnit,
	/// Optical expansion unit.
	#[serde(rename = "OEU")]
	ExpansionUnit,
	/// Low-power remote unit.
	#[serde(rename = "RU-L")]
	RemoteLow,
	/// Mid-power remote unit.
	#[serde(rename = "RU-M")]
	RemoteMid,
	/// High-power remote unit.
	#[serde(rename = "RU-H")]
	RemoteHigh,
}

static TYPE_TABLE: [TypeMeta; 6] = [
	TypeMeta {
		label: "MU",
		description: "Master Unit",
		family: "Prism Head-End",
		tier: Tier::HeadEnd,
		color: "#6366f1",
		power: None,
	},
	TypeMeta {
		label: "HEU",
		description: "Head-End Unit",
		family: "Prism Head-End",
		tier: Tier::HeadEnd,
		color: "#8b5cf6",
		power: None,
	},
	TypeMeta {
		label: "OEU",
		description: "Optical Expansion Unit",
		family: "Prism Distribution",
		tier: Tier::Distribution,
		color: "#0ea5e9",
		power: None,
	},
	TypeMeta {
		label: "RU-L",
		description: "Low-Power Remote Unit",
		family: "Prism Remote",
		tier: Tier::Remote,
		color: "#14b8a6",
		power: Some(PowerClass::Low),
	},
	TypeMeta {
		label: "RU-M",
		description: "Mid-Power Remote Unit",
		family: "Prism Remote",
		tier: Tier::Remote,
		color: "#10b981",
		power: Some(PowerClass::Mid),
	},
	TypeMeta {
		label: "RU-H",
		description: "High-Power Remote Unit",
		family: "Prism Remote",
		tier: Tier::Remote,
		color: "#84cc16",
		power: Some(PowerClass::High),
	},
];

impl DeviceType {
	/// Every device type, in legend order.
	pub const ALL: [DeviceType; 6] = [
		DeviceType::MasterUnit,
		DeviceType::HeadEndUnit,
		DeviceType::ExpansionUnit,
		DeviceType::RemoteLow,
		DeviceType::RemoteMid,
		DeviceType::RemoteHigh,
	];

	/// Static metadata for this type.
	pub fn meta(self) -> &'static TypeMeta {
		&TYPE_TABLE[self as usize]
	}

	/// Short label such as `"RU-H"`.
	pub fn label(self) -> &'static str {
		self.meta().label
	}

	/// Tier from the metadata table.
	pub fn tier(self) -> Tier {
		self.meta().tier
	}

	/// Case-insensitive lookup by short label.
	pub fn from_label(label: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|t| t.label().eq_ignore_ascii_case(label.trim()))
	}
}

/// Optional, type-dependent display fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeAttributes {
	/// Model number.
	pub model: Option<String>,
	/// Serial number.
	pub serial: Option<String>,
	/// Frequency band.
	pub band: Option<String>,
	/// Installation site.
	pub location: Option<String>,
	/// Output power, remote units.
	pub power: Option<String>,
	/// MIMO configuration, remote units.
	pub mimo: Option<String>,
	/// Fronthaul protocol.
	pub protocol: Option<String>,
	/// Port count, expansion units.
	pub ports: Option<u32>,
	/// Slot count, head-end units.
	pub slots: Option<u32>,
}

/// One device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
	/// Unique id.
	pub id: String,
	/// Device class.
	#[serde(rename = "type")]
	pub kind: DeviceType,
	/// Display name.
	pub label: String,
	/// Operational state.
	pub status: Status,
	/// Optional display fields.
	#[serde(default, rename = "attributes")]
	pub attrs: NodeAttributes,
}

/// Directed parent -> child connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopologyLink {
	/// Parent id.
	pub source: String,
	/// Child id.
	pub target: String,
	/// Transport medium. Media not mentioning fiber draw dashed.
	#[serde(rename = "type")]
	pub medium: String,
	/// Protocol shown in the link tooltip.
	#[serde(default)]
	pub label: Option<String>,
}

/// Unvalidated graph input, see [`super::TopologyGraph::new`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TopologyData {
	/// Devices.
	pub nodes: Vec<TopologyNode>,
	/// Parent to child connections.
	pub links: Vec<TopologyLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn metadata_table_matches_variants() {
		for kind in DeviceType::ALL {
			assert_eq!(DeviceType::from_label(kind.label()), Some(kind));
		}
		assert_eq!(DeviceType::RemoteHigh.meta().power, Some(PowerClass::High));
		assert_eq!(DeviceType::ExpansionUnit.tier(), Tier::Distribution);
		assert_eq!(DeviceType::MasterUnit.meta().power, None);
	}

	#[test]
	fn status_names_are_case_insensitive() {
		assert_eq!(Status::from_name("Offline"), Some(Status::Offline));
		assert_eq!(Status::from_name(" degraded "), Some(Status::Degraded));
		assert_eq!(Status::from_name("All"), None);
	}

	#[test]
	fn worst_status_prefers_higher_severity() {
		assert_eq!(Status::Online.worst(Status::Degraded), Status::Degraded);
		assert_eq!(Status::Offline.worst(Status::Degraded), Status::Offline);
		assert_eq!(Status::Online.worst(Status::Online), Status::Online);
	}

	#[test]
	fn topology_data_reads_json() {
		let data: TopologyData = serde_json::from_str(
			r#"{
				"nodes": [
					{"id": "mu", "type": "MU", "label": "MU", "status": "online",
					 "attributes": {"serial": "S1", "slots": 16}},
					{"id": "ru", "type": "RU-H", "label": "RU", "status": "degraded"}
				],
				"links": [{"source": "mu", "target": "ru", "type": "fiber"}]
			}"#,
		)
		.unwrap();

		assert_eq!(data.nodes[0].kind, DeviceType::MasterUnit);
		assert_eq!(data.nodes[0].attrs.slots, Some(16));
		assert_eq!(data.nodes[1].status, Status::Degraded);
		assert_eq!(data.nodes[1].attrs, NodeAttributes::default());
		assert_eq!(data.links[0].medium, "fiber");
		assert_eq!(data.links[0].label, None);
	}
}
