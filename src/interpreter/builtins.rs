//! Function calls
//!
//! Scripts can call two kinds of functions:
//!
//! - `print(items...)`: writes the items, separated by a space, as one line of
//!   the transcript
//! - Host functions registered with [`Interpreter::register_native`]
//!
//! Arguments are always evaluated left to right before the call.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::memory::Value;
use crate::script::ast::Expr;
use tracing::trace;

pub(crate) const PRINT: &str = "print";

impl Interpreter {
    pub(crate) fn execute_function_call(
        &mut self,
        name: &str,
        args: &[Expr],
    ) -> Result<Value, EvalError> {
        let location = self.current_location;

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate_expr(arg)?);
        }

        if name == PRINT {
            return Ok(self.builtin_print(&arg_values));
        }

        let entry = self
            .natives
            .get_mut(name)
            .ok_or_else(|| EvalError::UndefinedFunction {
                name: name.to_string(),
                location,
            })?;

        trace!(function = name, args = arg_values.len(), "calling host function");
        let result = (entry.func)(&arg_values).map_err(|message| EvalError::Native {
            function: name.to_string(),
            message,
            location,
        })?;

        if result.value_type() != entry.returns {
            return Err(EvalError::Native {
                function: name.to_string(),
                message: format!(
                    "returned {} but is declared to return {}",
                    result.value_type(),
                    entry.returns
                ),
                location,
            });
        }
        Ok(result)
    }

    fn builtin_print(&mut self, args: &[Value]) -> Value {
        let text = args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        self.transcript.print(&text, self.current_location);
        Value::Void
    }
}
