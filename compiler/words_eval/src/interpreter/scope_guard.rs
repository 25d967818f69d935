//! RAII scope guards for the interpreter.
//!
//! [`ScopedInterpreter`] pops the environment scope it pushed when dropped,
//! including during unwinding. It holds `&mut Interpreter` and derefs to it,
//! so the body being evaluated has the full interpreter available.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::value::Property;

/// Guard that exits the environment scope on drop.
pub struct ScopedInterpreter<'guard, 'env> {
    interpreter: &'guard mut Interpreter<'env>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.exit_scope();
    }
}

impl<'env> Deref for ScopedInterpreter<'_, 'env> {
    type Target = Interpreter<'env>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'env> Interpreter<'env> {
    /// Enter a scope that is exited when the returned guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'env> {
        self.env.enter_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a fresh scope.
    pub fn with_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'env>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` inside a fresh scope holding `bindings`.
    pub fn with_bindings<T, F, I>(&mut self, bindings: I, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'env>) -> T,
        I: IntoIterator<Item = (String, Property)>,
    {
        self.with_scope(|scoped| {
            for (name, value) in bindings {
                scoped.env.bind(&name, value);
            }
            f(scoped)
        })
    }
}
