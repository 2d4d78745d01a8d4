use crate::backends::wasm::function_context::FunctionContext;
use crate::compiler_frontend::ast::ast_nodes::{Expression, ExpressionKind, Operator};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokens::TextLocation;
use crate::settings::ARRAY_CELL_BYTES;
use crate::{return_error, return_rule_error};

impl FunctionContext<'_> {
    /// Leaves exactly one i32 on the operand stack
    pub fn lower_expression(&mut self, expression: &Expression) -> Result<(), CompilerError> {
        match &expression.kind {
            ExpressionKind::IntegerLiteral(text) => {
                let value = parse_integer_literal(text, &expression.location)?;
                self.emit(format!("i32.const {value}"));
            }

            ExpressionKind::VariableAccess(name) => {
                let symbol = self.symbols.lookup(name, &expression.location)?;

                if symbol.is_array {
                    return_error!(
                        KindMismatch,
                        format!("'{name}' is an array and can't be used as a number"),
                        expression.location.to_owned(),
                        {
                            CompilationStage => "Codegen",
                            VariableName => name,
                            PrimarySuggestion => format!("Read one of its elements instead, like '{name}[0]'"),
                        }
                    )
                }

                let get = format!("local.get ${}", symbol.mangled_name);
                self.emit(get);
            }

            ExpressionKind::ArrayAccess(name, index) => {
                self.lower_element_address(name, index, &expression.location)?;
                self.emit("i32.load");
            }

            ExpressionKind::FunctionCall(name, arguments) => {
                for argument in arguments {
                    self.lower_call_argument(argument)?;
                }

                // Callees are resolved by name when the module is assembled
                self.emit(format!("call ${name}"));
            }

            ExpressionKind::BinaryOperation(left, right, operator) => {
                self.lower_expression(left)?;
                self.lower_expression(right)?;

                let instruction = binary_instruction(*operator, &expression.location)?;
                self.emit(instruction);
            }

            ExpressionKind::UnaryOperation(operand, operator) => {
                self.lower_expression(operand)?;

                match operator {
                    Operator::Add => {}
                    Operator::Subtract => {
                        self.emit("i32.const -1");
                        self.emit("i32.mul");
                    }
                    Operator::BitNot => {
                        self.emit("i32.const -1");
                        self.emit("i32.xor");
                    }
                    Operator::Not => self.emit("i32.eqz"),
                    _ => {
                        return_error!(
                            UnsupportedOperation,
                            format!("'{operator}' can't be used as a prefix operator"),
                            expression.location.to_owned(),
                            {
                                CompilationStage => "Codegen",
                            }
                        )
                    }
                }
            }
        }

        Ok(())
    }

    /// Pushes `base + 4 * index` for an element of `name`
    pub fn lower_element_address(
        &mut self,
        name: &str,
        index: &Expression,
        location: &TextLocation,
    ) -> Result<(), CompilerError> {
        let symbol = self.symbols.lookup(name, location)?;

        if !symbol.is_array {
            return_error!(
                KindMismatch,
                format!("'{name}' is not an array, so it can't be indexed"),
                location.to_owned(),
                {
                    CompilationStage => "Codegen",
                    VariableName => name,
                    PrimarySuggestion => format!("Declare it as an array with 'let {name}[size]'"),
                }
            )
        }

        let base = format!("local.get ${}", symbol.mangled_name);
        self.emit(base);
        self.lower_expression(index)?;
        self.emit(format!("i32.const {ARRAY_CELL_BYTES}"));
        self.emit("i32.mul");
        self.emit("i32.add");

        Ok(())
    }

    // A bare array name passed straight to a call hands over its base address.
    // Everything else is an ordinary expression.
    fn lower_call_argument(&mut self, argument: &Expression) -> Result<(), CompilerError> {
        if let ExpressionKind::VariableAccess(name) = &argument.kind {
            let symbol = self.symbols.lookup(name, &argument.location)?;

            if symbol.is_array {
                let base = format!("local.get ${}", symbol.mangled_name);
                self.emit(base);
                return Ok(());
            }
        }

        self.lower_expression(argument)
    }
}

/// Literals are unsigned in the source and wrap into an i32 like WAT constants do
pub fn parse_integer_literal(text: &str, location: &TextLocation) -> Result<i32, CompilerError> {
    match text.parse::<u32>() {
        Ok(value) => Ok(value as i32),
        Err(_) => {
            return_rule_error!(
                format!("The integer literal '{text}' doesn't fit in 32 bits"),
                location.to_owned(),
                {
                    CompilationStage => "Codegen",
                    PrimarySuggestion => "Use a value no larger than 4294967295",
                }
            )
        }
    }
}

pub fn binary_instruction(
    operator: Operator,
    location: &TextLocation,
) -> Result<&'static str, CompilerError> {
    let instruction = match operator {
        Operator::Add => "i32.add",
        Operator::Subtract => "i32.sub",
        Operator::Multiply => "i32.mul",
        Operator::Divide => "i32.div_s",
        Operator::Modulus => "i32.rem_s",
        Operator::BitAnd => "i32.and",
        Operator::BitOr => "i32.or",
        Operator::BitXor => "i32.xor",
        Operator::ShiftLeft => "i32.shl",
        Operator::ShiftRight => "i32.shr_s",
        Operator::LessThan => "i32.lt_s",
        Operator::LessThanOrEqual => "i32.le_s",
        Operator::GreaterThan => "i32.gt_s",
        Operator::GreaterThanOrEqual => "i32.ge_s",
        Operator::Equal => "i32.eq",
        Operator::NotEqual => "i32.ne",

        Operator::BitNot | Operator::Not => {
            return_error!(
                UnsupportedOperation,
                format!("'{operator}' can only be used as a prefix operator"),
                location.to_owned(),
                {
                    CompilationStage => "Codegen",
                }
            )
        }
    };

    Ok(instruction)
}
