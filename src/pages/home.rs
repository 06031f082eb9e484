use leptos::prelude::*;
use log::info;

use crate::components::topology::{
	DeviceType, NodeAttributes, Status, TopologyBuilder, TopologyCanvas, TopologyData,
	TopologyGraph, inventory_rows,
};

const BANDS: &[&str] = &["700 MHz", "850 MHz", "AWS 1700/2100", "PCS 1900", "BRS 2500"];

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn pick_status(r: f64) -> Status {
	if r < 0.78 {
		Status::Online
	} else if r < 0.92 {
		Status::Degraded
	} else {
		Status::Offline
	}
}

/// Generate a sample campus: one master unit per building feeding head-ends,
/// expansion units and remote units.
fn generate_sample_topology(buildings: usize) -> TopologyData {
	let mut b = TopologyBuilder::new();
	let mut seed = 0;
	let mut rand = move || {
		seed += 1;
		rand_simple(seed * 7)
	};

	for bldg in 1..=buildings {
		let mu = b.root(
			DeviceType::MasterUnit,
			&format!("Building {bldg} MU"),
			pick_status(rand()),
			NodeAttributes {
				model: Some("MU-16".into()),
				serial: Some(format!("MU{bldg:04}")),
				location: Some(format!("Building {bldg}, MDF")),
				slots: Some(16),
				..Default::default()
			},
		);
		let head_ends = 1 + (rand() * 2.0) as usize;
		for h in 1..=head_ends {
			let heu = b.child(
				&mu,
				DeviceType::HeadEndUnit,
				&format!("B{bldg} HEU {h}"),
				pick_status(rand()),
				NodeAttributes {
					model: Some("HEU-8".into()),
					band: Some(BANDS[(bldg + h) % BANDS.len()].into()),
					location: Some(format!("Building {bldg}, MDF rack {h}")),
					slots: Some(8),
					..Default::default()
				},
				"RF coax",
				None,
			);
			let expansions = 1 + (rand() * 3.0) as usize;
			for e in 1..=expansions {
				let floor = h * 3 + e;
				let oeu = b.child(
					&heu,
					DeviceType::ExpansionUnit,
					&format!("B{bldg} OEU {h}.{e}"),
					pick_status(rand()),
					NodeAttributes {
						model: Some("OEU-8".into()),
						location: Some(format!("Building {bldg}, IDF floor {floor}")),
						protocol: Some("CPRI".into()),
						ports: Some(8),
						..Default::default()
					},
					"single-mode fiber",
					Some("CPRI"),
				);
				let remotes = 2 + (rand() * 4.0) as usize;
				for r in 1..=remotes {
					let roll = rand();
					let (kind, power, mimo) = if roll < 0.5 {
						(DeviceType::RemoteLow, "20 dBm", "2x2")
					} else if roll < 0.85 {
						(DeviceType::RemoteMid, "27 dBm", "2x2")
					} else {
						(DeviceType::RemoteHigh, "33 dBm", "4x4")
					};
					b.child(
						&oeu,
						kind,
						&format!("B{bldg} RU {floor}-{r}"),
						pick_status(rand()),
						NodeAttributes {
							model: Some(format!("{}-100", kind.label())),
							serial: Some(format!("RU{bldg}{floor:02}{r:02}")),
							band: Some(BANDS[(floor + r) % BANDS.len()].into()),
							location: Some(format!("Building {bldg}, floor {floor}, zone {r}")),
							power: Some(power.into()),
							mimo: Some(mimo.into()),
							..Default::default()
						},
						"single-mode fiber",
						Some("CPRI"),
					);
				}
			}
		}
	}
	b.finish()
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (search, set_search) = signal(String::new());
	let (status, set_status) = signal("All".to_string());
	let (kind, set_kind) = signal("All".to_string());

	let topology = TopologyGraph::new(generate_sample_topology(3));
	let summary = topology.as_ref().ok().map(|graph| {
		let rows = inventory_rows(graph);
		let count = |s: &str| rows.iter().filter(|r| r.status == s).count();
		info!("inventory: {} devices", rows.len());
		format!(
			"{} devices: {} connected, {} warning, {} disconnected",
			rows.len(),
			count("Connected"),
			count("Warning"),
			count("Disconnected"),
		)
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{topology
					.map(|graph| {
						view! {
							<TopologyCanvas
								graph=graph
								search=search
								status_filter=status
								type_filter=kind
								fullscreen=true
							/>
						}
					})}
				<div class="graph-overlay">
					<h1>"DAS Topology"</h1>
					<p class="subtitle">
						"Click a unit to collapse or expand it. Scroll to zoom. Drag background to pan."
					</p>
					<p class="subtitle">{summary}</p>
					<div class="filter-bar">
						<input
							type="search"
							placeholder="Search label, location, band"
							prop:value=move || search.get()
							on:input=move |ev| set_search.set(event_target_value(&ev))
						/>
						<select on:change=move |ev| set_status.set(event_target_value(&ev))>
							<option value="All">"All statuses"</option>
							{Status::ALL
								.into_iter()
								.map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
								.collect_view()}
						</select>
						<select on:change=move |ev| set_kind.set(event_target_value(&ev))>
							<option value="All">"All types"</option>
							{DeviceType::ALL
								.into_iter()
								.map(|t| {
									view! {
										<option value=t.label()>{t.meta().description}</option>
									}
								})
								.collect_view()}
						</select>
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sample_topology_is_a_valid_forest() {
		let graph = TopologyGraph::new(generate_sample_topology(3)).unwrap();
		assert_eq!(graph.adjacency().roots().len(), 3);
		assert!(graph.len() > 20);
	}

	#[test]
	fn sample_topology_is_deterministic() {
		let a = generate_sample_topology(2);
		let b = generate_sample_topology(2);
		assert_eq!(a.nodes, b.nodes);
		assert_eq!(a.links, b.links);
	}
}
