pub mod ast_nodes;
pub mod build_ast;
pub mod expressions {
    pub mod parse_expression;
}
pub mod statements {
    pub mod branching;
    pub mod declarations;
    pub mod loops;
}

#[cfg(test)]
mod tests;
