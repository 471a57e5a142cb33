// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Scope frames and the scope stack (§3, §4.3 scope stack operations).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A single lexical block's bindings: an insertion-order-irrelevant
/// mapping from name to value.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: HashMap<String, Value>,
}

/// Shared ownership of a scope frame: the scope stack and every
/// closure that captured it hold a reference, and the frame is
/// reclaimed only once the last holder drops it (§3 Closure
/// ownership). Plain `Rc`/`RefCell` suffices — frames form no cycles,
/// since a closure stores an owned snapshot `Vec<ScopeRef>` rather
/// than a back-reference into the stack that created it.
pub type ScopeRef = Rc<RefCell<Scope>>;

impl Scope {
    pub fn new() -> ScopeRef {
        Rc::new(RefCell::new(Scope::default()))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Clones the current bindings, for `Interpreter::run`'s
    /// snapshot-and-restore of the global scope (§4.3).
    pub fn snapshot_bindings(&self) -> HashMap<String, Value> {
        self.bindings.clone()
    }

    pub fn restore_bindings(&mut self, bindings: HashMap<String, Value>) {
        self.bindings = bindings;
    }
}

/// The interpreter's scope stack. Position 0 is the global scope and
/// is never popped (§3 invariants).
pub struct ScopeStack {
    frames: Vec<ScopeRef>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![Scope::new()],
        }
    }

    pub fn global(&self) -> &ScopeRef {
        &self.frames[0]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Truncates the stack back to `depth` frames, dropping the rest.
    /// Used to restore the pre-try depth on exception unwinding (§4.3
    /// TryCatch, §5 failure and unwinding).
    pub fn truncate(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }

    /// Pushes a new, possibly pre-populated frame.
    pub fn enter_scope(&mut self, frame: ScopeRef) {
        log::trace!("enter_scope depth={}", self.frames.len() + 1);
        self.frames.push(frame);
    }

    /// Pushes a fresh, empty frame.
    pub fn enter_new_scope(&mut self) {
        self.enter_scope(Scope::new());
    }

    /// Pushes every frame of a captured snapshot on top of the current
    /// stack, in order (§4.3 Call/Closure).
    pub fn enter_snapshot(&mut self, snapshot: &[ScopeRef]) {
        for frame in snapshot {
            self.enter_scope(frame.clone());
        }
    }

    /// Pops the top frame.
    pub fn exit_scope(&mut self) {
        if self.frames.len() <= 1 {
            log::warn!("attempted to pop the outermost (global) scope");
            return;
        }
        self.frames.pop();
        log::trace!("exit_scope depth={}", self.frames.len());
    }

    /// Pops `count` frames from the top, e.g. after restoring a
    /// closure's captured snapshot.
    pub fn exit_many(&mut self, count: usize) {
        for _ in 0..count {
            self.exit_scope();
        }
    }

    /// Searches from top to bottom for the frame containing `name`.
    pub fn find_var(&self, name: &str) -> Option<ScopeRef> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.borrow().contains(name))
            .cloned()
    }

    /// Mutates the existing binding in the nearest enclosing frame that
    /// has it; returns `false` if no such binding exists.
    pub fn set_var(&mut self, name: &str, value: Value) -> bool {
        match self.find_var(name) {
            Some(frame) => {
                frame.borrow_mut().set(name, value);
                true
            }
            None => false,
        }
    }

    /// Creates a new binding in the top-of-stack frame; returns `false`
    /// if that frame already has `name` bound.
    pub fn define_var(&mut self, name: &str, value: Value) -> bool {
        let top = self.frames.last().expect("scope stack is never empty");
        if top.borrow().contains(name) {
            return false;
        }
        top.borrow_mut().define(name.to_string(), value);
        true
    }

    pub fn get_var(&self, name: &str) -> Option<Value> {
        self.find_var(name).and_then(|frame| frame.borrow().get(name))
    }

    /// Snapshot of the full current stack, for closure capture (§3).
    pub fn snapshot(&self) -> Vec<ScopeRef> {
        self.frames.clone()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared ownership of the whole stack, so host callables registered
/// by [`crate::builtins`] (`exists`, `global`) can reach it from a
/// plain closure the same way a [`Closure`](crate::value::Closure)
/// reaches its captured frames.
pub type ScopeStackRef = Rc<RefCell<ScopeStack>>;
