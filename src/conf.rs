// tb_conf.svh: build-time defines selecting the DUT and its AXI-stream setup.

use crate::config::RunConfig;

/// Defines in emission order.
pub fn defines(config: &RunConfig) -> Vec<String> {
    let iface = &config.interface;
    let mut lines = vec![format!("`define {}", config.variant.define_name())];

    if config.variant.caps.interface_widths {
        lines.push(format!("`define S_AXIS_WIDTH {}", iface.slave_width));
        lines.push(format!("`define M_AXIS_WIDTH {}", iface.master_width));
    }
    lines.push(format!("`define S_AXIS_DELAY {}", iface.slave_delay));
    lines.push(format!("`define M_AXIS_DELAY {}", iface.master_delay));

    lines
}

pub fn render(config: &RunConfig) -> String {
    defines(config).into_iter().map(|line| line + "\n").collect()
}
