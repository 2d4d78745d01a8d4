use crate::backends::wasm::constants::{EXIT_LABEL, STACK_POINTER};
use crate::backends::wasm::function_context::FunctionContext;
use crate::compiler_frontend::ast::ast_nodes::{
    Block, Expression, ExpressionKind, Statement, StatementKind, VariableDeclaration,
};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::settings::ARRAY_CELL_BYTES;
use crate::{codegen_log, return_error, return_rule_error};

impl FunctionContext<'_> {
    /// A block is a scope. Everything declared inside is gone once it ends.
    pub fn lower_block(&mut self, block: &Block) -> Result<(), CompilerError> {
        self.with_scope(|context| {
            for statement in &block.statements {
                context.lower_statement(statement)?;
            }
            Ok(())
        })
    }

    /// Every statement leaves the operand stack as it found it
    pub fn lower_statement(&mut self, statement: &Statement) -> Result<(), CompilerError> {
        codegen_log!("Lowering ", #statement.kind);

        match &statement.kind {
            StatementKind::Block(block) => self.lower_block(block),

            StatementKind::Expression(expression) => {
                self.lower_expression(expression)?;
                self.emit("drop");
                Ok(())
            }

            StatementKind::Let(declarations) => {
                for declaration in declarations {
                    self.lower_declaration(declaration)?;
                }
                Ok(())
            }

            StatementKind::Assignment(target, value) => {
                self.lower_assignment(target, value, &statement.location)
            }

            StatementKind::Return(value) => {
                match value {
                    Some(value) => self.lower_expression(value)?,
                    None => self.emit("i32.const 0"),
                }
                self.emit(format!("br {EXIT_LABEL}"));
                Ok(())
            }

            StatementKind::If(condition, then_block, else_block) => {
                self.lower_expression(condition)?;
                self.emit("if");
                self.indent();
                self.lower_block(then_block)?;

                if let Some(else_block) = else_block {
                    self.dedent();
                    self.emit("else");
                    self.indent();
                    self.lower_block(else_block)?;
                }

                self.dedent();
                self.emit("end");
                Ok(())
            }

            StatementKind::Loop(body) => self.with_loop(|context, labels| {
                context.emit(format!("block {}", labels.break_label));
                context.indent();
                context.emit(format!("loop {}", labels.continue_label));
                context.indent();

                context.lower_block(body)?;
                context.emit(format!("br {}", labels.continue_label));

                context.dedent();
                context.emit("end");
                context.dedent();
                context.emit("end");
                Ok(())
            }),

            StatementKind::Break => {
                let Some(labels) = self.control_flow.innermost_loop() else {
                    return_rule_error!("'break' can only be used inside a loop", statement.location.to_owned(), {
                        CompilationStage => "Codegen",
                    })
                };

                let branch = format!("br {}", labels.break_label);
                self.emit(branch);
                Ok(())
            }

            StatementKind::Continue => {
                let Some(labels) = self.control_flow.innermost_loop() else {
                    return_rule_error!("'continue' can only be used inside a loop", statement.location.to_owned(), {
                        CompilationStage => "Codegen",
                    })
                };

                let branch = format!("br {}", labels.continue_label);
                self.emit(branch);
                Ok(())
            }
        }
    }

    fn lower_declaration(&mut self, declaration: &VariableDeclaration) -> Result<(), CompilerError> {
        let symbol = self.symbols.declare(declaration)?;
        self.add_local(&symbol.mangled_name);

        match symbol.stack_offset {
            // The array sits below the top of this function's frame
            Some(stack_offset) => {
                self.emit(format!("global.get {STACK_POINTER}"));
                self.emit(format!("i32.const {}", stack_offset * ARRAY_CELL_BYTES));
                self.emit("i32.sub");
            }

            // Scalars start at zero every time the declaration runs, not just on function entry
            None => self.emit("i32.const 0"),
        }

        self.emit(format!("local.set ${}", symbol.mangled_name));
        Ok(())
    }

    fn lower_assignment(
        &mut self,
        target: &Expression,
        value: &Expression,
        location: &TextLocation,
    ) -> Result<(), CompilerError> {
        match &target.kind {
            ExpressionKind::VariableAccess(name) => {
                let symbol = self.symbols.lookup(name, &target.location)?.to_owned();

                if symbol.is_array {
                    return_error!(
                        KindMismatch,
                        format!("Can't assign to the array '{name}' itself, assign to one of its elements instead"),
                        target.location.to_owned(),
                        {
                            CompilationStage => "Codegen",
                            VariableName => name,
                            PrimarySuggestion => format!("Index into it, like '{name}[0] = ...'"),
                        }
                    )
                }

                self.lower_expression(value)?;
                self.emit(format!("local.set ${}", symbol.mangled_name));
                Ok(())
            }

            ExpressionKind::ArrayAccess(name, index) => {
                self.lower_element_address(name, index, &target.location)?;
                self.lower_expression(value)?;
                self.emit("i32.store");
                Ok(())
            }

            _ => {
                return_error!(
                    Unassignable,
                    format!("Can't assign to '{target}', only variables and array elements can be assigned to"),
                    location.to_owned(),
                    {
                        CompilationStage => "Codegen",
                    }
                )
            }
        }
    }
}
