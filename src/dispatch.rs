//! A minimal stand-in for a host-language binding layer: a handle table
//! keyed by opaque `u64`s, and an op-code -> handler table dispatching
//! positional, loosely-typed [`Value`] arguments onto [`Categorical`]
//! methods. A real binding would marshal across an FFI boundary instead;
//! this module exists so the crate can be exercised end-to-end without one.

use crate::categorical::Categorical;
use crate::error::{Error, Result, Status};
use std::collections::HashMap;

/// A loosely-typed argument or return value crossing the dispatch boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(String),
    Strings(Vec<String>),
    Indices(Vec<u64>),
    UInt(u64),
    Bool(bool),
}

impl Value {
    fn as_scalar(&self) -> Result<&str> {
        match self {
            Value::Scalar(s) => Ok(s),
            _ => Err(Error::from(Status::WrongIndexSize)),
        }
    }

    fn as_strings(&self) -> Result<&[String]> {
        match self {
            Value::Strings(s) => Ok(s),
            _ => Err(Error::from(Status::WrongIndexSize)),
        }
    }
}

/// Owns every live `Categorical`, addressed by an opaque handle minted on
/// `create`. Destroying a handle drops its array.
#[derive(Default)]
pub struct Registry {
    next_handle: u64,
    instances: HashMap<u64, Categorical>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> u64 {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.instances.insert(handle, Categorical::new());
        handle
    }

    pub fn destroy(&mut self, handle: u64) -> bool {
        self.instances.remove(&handle).is_some()
    }

    fn get_mut(&mut self, handle: u64) -> Result<&mut Categorical> {
        self.instances
            .get_mut(&handle)
            .ok_or(Error::from(Status::CategoryDoesNotExist))
    }

    fn get(&self, handle: u64) -> Result<&Categorical> {
        self.instances
            .get(&handle)
            .ok_or(Error::from(Status::CategoryDoesNotExist))
    }
}

/// A handler for one op-code: takes the target handle and its positional
/// arguments, returns its positional outputs.
pub type Handler = fn(&mut Registry, u64, &[Value]) -> Result<Vec<Value>>;

fn op_add_category(reg: &mut Registry, handle: u64, args: &[Value]) -> Result<Vec<Value>> {
    let category = args[0].as_scalar()?;
    reg.get_mut(handle)?.add_category(category)?;
    Ok(Vec::new())
}

fn op_set_category(reg: &mut Registry, handle: u64, args: &[Value]) -> Result<Vec<Value>> {
    let category = args[0].as_scalar()?;
    let values = args[1].as_strings()?;
    reg.get_mut(handle)?.set_category(category, values)?;
    Ok(Vec::new())
}

fn op_full_category(reg: &mut Registry, handle: u64, args: &[Value]) -> Result<Vec<Value>> {
    let category = args[0].as_scalar()?;
    let labels = reg.get(handle)?.full_category(category)?;
    Ok(vec![Value::Strings(labels)])
}

fn op_find(reg: &mut Registry, handle: u64, args: &[Value]) -> Result<Vec<Value>> {
    let labels = args[0].as_strings()?;
    let rows = reg.get(handle)?.find(labels, 0);
    Ok(vec![Value::Indices(rows)])
}

fn op_size(reg: &mut Registry, handle: u64, _args: &[Value]) -> Result<Vec<Value>> {
    Ok(vec![Value::UInt(reg.get(handle)?.size())])
}

fn op_resize(reg: &mut Registry, handle: u64, args: &[Value]) -> Result<Vec<Value>> {
    let n = match &args[0] {
        Value::UInt(n) => *n,
        _ => return Err(Error::from(Status::WrongIndexSize)),
    };
    reg.get_mut(handle)?.resize(n);
    Ok(Vec::new())
}

fn op_has_category(reg: &mut Registry, handle: u64, args: &[Value]) -> Result<Vec<Value>> {
    let category = args[0].as_scalar()?;
    Ok(vec![Value::Bool(reg.get(handle)?.has_category(category))])
}

/// Builds the op-code -> handler table a binding layer would dispatch
/// through.
pub fn op_table() -> HashMap<&'static str, Handler> {
    let mut table: HashMap<&'static str, Handler> = HashMap::new();
    table.insert("add_category", op_add_category);
    table.insert("set_category", op_set_category);
    table.insert("full_category", op_full_category);
    table.insert("find", op_find);
    table.insert("size", op_size);
    table.insert("resize", op_resize);
    table.insert("has_category", op_has_category);
    table
}
