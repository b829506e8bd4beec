pub mod code_areas;
pub mod filtered_top;
pub mod group_sort;
pub mod stack_top;

pub use code_areas::collect_code_areas;
pub use filtered_top::{StackTopView, filtered_stack_top, is_node_excluded};
pub use group_sort::{GroupedValues, compute_grouped_sort_values, node_value, visible_children};
pub use stack_top::add_stack_top_values;
