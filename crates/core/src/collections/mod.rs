mod history_stack;
mod keyed_table;
mod rank_heap;

pub use history_stack::HistoryStack;
pub use keyed_table::KeyedTable;
pub use rank_heap::RankHeap;
