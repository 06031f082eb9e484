use leptos::mount::mount_to_body;
use topology_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
