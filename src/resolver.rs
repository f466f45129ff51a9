//! Static resolution pass.
//!
//! This module performs a single AST walk to:
//! 1. **Build lexical scopes**: maintains a stack of `HashMap<String, bool>`
//!    tracking declared (false) and fully defined (true) names in each nested
//!    block or function.
//! 2. **Enforce static rules**: reports errors such as redeclaration in the
//!    same scope, reading a variable in its own initializer, `return` outside
//!    functions, value-carrying `return` inside an initializer, and illegal
//!    `this`/`super` placement.
//! 3. **Record binding distances**: for every `Variable`, `Assign`, `This`
//!    and `Super` occurrence, calls back into the interpreter to note the
//!    scope distance (or nothing, for globals).  This enables the runtime to
//!    climb exactly the right number of environment frames, so a closure
//!    keeps seeing the bindings that existed at its definition site.
//!
//! Errors are accumulated, not thrown: resolution continues past each one so
//! a single pass reports as many diagnostics as it can.  The session consults
//! the returned list and skips evaluation when it is non-empty.

use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use log::{debug, info};

use crate::error::LoxError;
use crate::expr::{Expr, ExprId};
use crate::interpreter::Interpreter;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;

/// What kind of function body are we inside?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ClassType {
    /// Not inside any class
    None,

    /// Inside a class declaration _without_ a superclass
    Class,

    /// Inside a class declaration _with_ a superclass
    Subclass,
}

/// Resolver: tracks scopes, enforces static rules, and *records* binding
/// distances (locals vs. globals) by calling back into the interpreter.
pub struct Resolver<'a, 'out, W: Write> {
    interpreter: &'a mut Interpreter<'out, W>,
    scopes: Vec<HashMap<String, bool>>, // false=declared, true=defined
    current_function: FunctionType,
    current_class: ClassType,
    errors: Vec<LoxError>,
}

impl<'a, 'out, W: Write> Resolver<'a, 'out, W> {
    /// Create a new resolver bound to the given interpreter.
    pub fn new(interpreter: &'a mut Interpreter<'out, W>) -> Self {
        info!("Resolver instantiated");
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            errors: Vec::new(),
        }
    }

    /// Walk all top‑level statements and return every static error found.
    pub fn resolve(mut self, statements: &[Stmt]) -> Vec<LoxError> {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt);
        }

        self.errors
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();

                for s in statements {
                    self.resolve_stmt(s);
                }

                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                // Declared but not yet defined while its initializer runs,
                // so `var a = a;` is caught below in `Expr::Variable`.
                self.declare(name);

                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }

                self.define(name);
            }

            Stmt::Function(declaration) => {
                // Declared and defined eagerly so the function can recurse.
                self.declare(&declaration.name);
                self.define(&declaration.name);

                self.resolve_function(declaration, FunctionType::Function);
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);

                if let Some(else_branch) = else_branch.as_deref() {
                    self.resolve_stmt(else_branch);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error(keyword.line, "Can't return from top-level code.");
                }

                if let Some(expr) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(keyword.line, "Can't return a value from an initializer.");
                    }

                    self.resolve_expr(expr);
                }
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),
        }
    }

    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) {
        let enclosing_class: ClassType = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(name);
        self.define(name);

        if let Some(superclass) = superclass {
            if let Expr::Variable {
                name: super_name, ..
            } = superclass
            {
                if super_name.lexeme == name.lexeme {
                    self.error(super_name.line, "A class can't inherit from itself.");
                }
            }

            self.resolve_expr(superclass);

            self.current_class = ClassType::Subclass;

            // `super` lives in a scope of its own, wrapped around the
            // `this` scope below.
            self.begin_scope();
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert("super".to_string(), true);
            }
        }

        self.begin_scope();
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert("this".to_string(), true);
        }

        for method in methods {
            let kind: FunctionType = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };

            self.resolve_function(method, kind);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => {
                self.resolve_expr(inner);
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right);
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.error(
                            name.line,
                            "Can't read local variable in its own initializer.",
                        );
                    }
                }

                self.resolve_local(*id, name);
            }

            Expr::Assign { id, name, value } => {
                // Right-hand side first, then bind the assignment target.
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);

                for argument in arguments {
                    self.resolve_expr(argument);
                }
            }

            Expr::Get { object, .. } => {
                // Property names are looked up dynamically; only the object
                // expression resolves statically.
                self.resolve_expr(object);
            }

            Expr::Set { object, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(value);
            }

            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.error(keyword.line, "Can't use 'this' outside of a class.");
                    return;
                }

                self.resolve_local(*id, keyword);
            }

            Expr::Super { id, keyword, .. } => {
                if self.current_class == ClassType::None {
                    self.error(keyword.line, "Can't use 'super' outside of a class.");
                } else if self.current_class != ClassType::Subclass {
                    self.error(
                        keyword.line,
                        "Can't use 'super' in a class with no superclass.",
                    );
                }

                self.resolve_local(*id, keyword);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function's parameters + body.
    ///
    /// `kind` distinguishes plain functions, methods and initializers.
    fn resolve_function(&mut self, declaration: &FunctionDecl, kind: FunctionType) {
        let enclosing: FunctionType = self.current_function;
        self.current_function = kind;

        self.begin_scope();

        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }

        for stmt in &declaration.body {
            self.resolve_stmt(stmt);
        }

        self.end_scope();

        self.current_function = enclosing;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        // Globals fall through: only local scopes reject duplicates.
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                self.errors.push(LoxError::resolve(
                    name.line,
                    "Already a variable with this name in this scope.",
                ));
            }

            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this occurrence as a local at the distance of the innermost
    /// scope containing `name`, or leave it to globals if no scope does.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);

                self.interpreter.note_local(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }

    fn error(&mut self, line: usize, message: &str) {
        self.errors.push(LoxError::resolve(line, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve_source(source: &str) -> Vec<LoxError> {
        let scanner = Scanner::new(source.as_bytes().to_vec());
        let mut parser = Parser::new(scanner, 0);
        let statements = parser.parse();

        assert!(
            parser.into_errors().is_empty(),
            "test source must parse cleanly"
        );

        let mut out: Vec<u8> = Vec::new();
        let mut interpreter = Interpreter::new(&mut out);

        Resolver::new(&mut interpreter).resolve(&statements)
    }

    fn messages(source: &str) -> Vec<String> {
        resolve_source(source)
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn clean_program_resolves_without_errors() {
        let errors = resolve_source(
            "fun outer() { var a = 1; fun inner() { return a; } return inner; }",
        );

        assert!(errors.is_empty(), "got: {:?}", errors);
    }

    #[test]
    fn reading_a_local_in_its_own_initializer() {
        let msgs = messages("{ var a = 1; { var a = a; } }");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("Can't read local variable in its own initializer."));
    }

    #[test]
    fn global_self_reference_is_left_to_the_runtime() {
        // Globals are not tracked on the scope stack.
        assert!(resolve_source("var a = a;").is_empty());
    }

    #[test]
    fn duplicate_local_declaration() {
        let msgs = messages("{ var a = 1; var a = 2; }");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("Already a variable with this name in this scope."));
    }

    #[test]
    fn global_redefinition_is_allowed() {
        assert!(resolve_source("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn return_at_top_level() {
        let msgs = messages("return 1;");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("Can't return from top-level code."));
    }

    #[test]
    fn value_return_from_initializer() {
        let msgs = messages("class A { init() { return 1; } }");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("Can't return a value from an initializer."));
    }

    #[test]
    fn bare_return_from_initializer_is_fine() {
        assert!(resolve_source("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn this_outside_a_class() {
        let msgs = messages("print this;");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("Can't use 'this' outside of a class."));
    }

    #[test]
    fn super_outside_a_class() {
        let msgs = messages("fun f() { super.method(); }");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("Can't use 'super' outside of a class."));
    }

    #[test]
    fn super_without_a_superclass() {
        let msgs = messages("class A { method() { super.method(); } }");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("Can't use 'super' in a class with no superclass."));
    }

    #[test]
    fn class_inheriting_from_itself() {
        let msgs = messages("class A < A {}");

        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("A class can't inherit from itself."));
    }

    #[test]
    fn multiple_errors_are_all_reported() {
        let msgs = messages("return 1;\nprint this;\n{ var a = 1; var a = 2; }");

        assert_eq!(msgs.len(), 3);
    }
}
