use super::types::{DeviceType, NodeAttributes, Status, TopologyData, TopologyLink, TopologyNode};

/// Assembles [`TopologyData`] parent by parent, minting ids as it goes.
///
/// Ids are `<type label>-<n>` with a counter owned by the builder, so two
/// builders never share state.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
	next_id: u32,
	data: TopologyData,
}

impl TopologyBuilder {
	/// Empty builder, ids start at 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a root device and return its id.
	pub fn root(&mut self, kind: DeviceType, label: &str, status: Status, attrs: NodeAttributes) -> String {
		self.next_id += 1;
		let id = format!("{}-{}", kind.label().to_lowercase(), self.next_id);
		self.data.nodes.push(TopologyNode {
			id: id.clone(),
			kind,
			label: label.to_string(),
			status,
			attrs,
		});
		id
	}

	/// Add a device below `parent`, connected over `medium`, and return its id.
	#[allow(clippy::too_many_arguments)]
	pub fn child(
		&mut self,
		parent: &str,
		kind: DeviceType,
		label: &str,
		status: Status,
		attrs: NodeAttributes,
		medium: &str,
		protocol: Option<&str>,
	) -> String {
		let id = self.root(kind, label, status, attrs);
		self.data.links.push(TopologyLink {
			source: parent.to_string(),
			target: id.clone(),
			medium: medium.to_string(),
			label: protocol.map(str::to_string),
		});
		id
	}

	/// The assembled nodes and links.
	pub fn finish(self) -> TopologyData {
		self.data
	}
}
