use crate::error::{LoxError, Result};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One frame of the lexical scope chain.  The root frame holds globals;
/// every block or call entry pushes a child that keeps a strong reference
/// to its parent, so chains captured by closures outlive their blocks.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Insert into this frame.  Redefinition is allowed here; duplicate
    /// locals are rejected earlier, by the resolver.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str, line: usize) -> Result<Value> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name, line)
        } else {
            Err(undefined_variable(name, line))
        }
    }

    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<()> {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value, line)
        } else {
            Err(undefined_variable(name, line))
        }
    }

    /// Read from the frame exactly `distance` ancestors up.  The resolver
    /// guarantees presence; a miss surfaces as `Undefined variable` rather
    /// than a panic.
    pub fn get_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        line: usize,
    ) -> Result<Value> {
        let frame = Environment::ancestor(env, distance);

        frame
            .and_then(|frame| {
                let value = frame.borrow().values.get(name).cloned();
                value
            })
            .ok_or_else(|| undefined_variable(name, line))
    }

    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
        line: usize,
    ) -> Result<()> {
        match Environment::ancestor(env, distance) {
            Some(frame) => {
                frame.borrow_mut().values.insert(name.to_string(), value);
                Ok(())
            }

            None => Err(undefined_variable(name, line)),
        }
    }

    /// The frame `distance` steps up the chain (0 = this frame).
    pub fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut frame: Option<Rc<RefCell<Environment>>> = Some(env.clone());

        for _ in 0..distance {
            frame = frame.and_then(|f| f.borrow().enclosing.clone());
        }

        frame
    }
}

fn undefined_variable(name: &str, line: usize) -> LoxError {
    LoxError::runtime(line, format!("Undefined variable '{}'.", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped(env: Environment) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(env))
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::new();
        env.define("a", Value::Number(1.0));

        assert_eq!(env.get("a", 1).unwrap().to_string(), "1");
    }

    #[test]
    fn get_walks_the_chain() {
        let globals = wrapped(Environment::new());
        globals.borrow_mut().define("a", Value::Str("outer".into()));

        let inner = Environment::with_enclosing(globals);

        assert_eq!(inner.get("a", 1).unwrap().to_string(), "outer");
    }

    #[test]
    fn assign_overwrites_the_owning_frame() {
        let globals = wrapped(Environment::new());
        globals.borrow_mut().define("a", Value::Number(1.0));

        let mut inner = Environment::with_enclosing(globals.clone());
        inner.assign("a", Value::Number(2.0), 1).unwrap();

        assert_eq!(globals.borrow().get("a", 1).unwrap().to_string(), "2");
    }

    #[test]
    fn assign_to_unknown_name_fails() {
        let mut env = Environment::new();

        assert!(env.assign("missing", Value::Nil, 3).is_err());
    }

    #[test]
    fn get_at_skips_shadowing_frames() {
        let globals = wrapped(Environment::new());
        globals.borrow_mut().define("a", Value::Str("outer".into()));

        let inner = wrapped(Environment::with_enclosing(globals));
        inner.borrow_mut().define("a", Value::Str("inner".into()));

        assert_eq!(
            Environment::get_at(&inner, 0, "a", 1).unwrap().to_string(),
            "inner"
        );
        assert_eq!(
            Environment::get_at(&inner, 1, "a", 1).unwrap().to_string(),
            "outer"
        );
    }

    #[test]
    fn assign_at_targets_the_exact_frame() {
        let globals = wrapped(Environment::new());
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = wrapped(Environment::with_enclosing(globals.clone()));
        inner.borrow_mut().define("a", Value::Number(10.0));

        Environment::assign_at(&inner, 1, "a", Value::Number(2.0), 1).unwrap();

        assert_eq!(globals.borrow().get("a", 1).unwrap().to_string(), "2");
        assert_eq!(inner.borrow().get("a", 1).unwrap().to_string(), "10");
    }
}
