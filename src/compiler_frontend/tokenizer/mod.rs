pub mod tokenizer;
pub mod tokens;

#[cfg(test)]
mod tests;
