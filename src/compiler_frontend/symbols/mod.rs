pub mod symbol_table;

#[cfg(test)]
mod tests;
