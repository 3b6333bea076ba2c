use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    ffi::c_void,
    path::Path,
    rc::Rc,
};

use mlua::{Function, Lua, RegistryKey, Table, Value};
use tracing::{debug, trace};

use crate::{
    diagnostics::{COMPILETIME_EVAL, Diagnostic, INTERPRETER_INIT_FAILED, position::{Position, Span}},
    module_graph::ModuleId,
    store::ModuleStore,
};

use super::{
    instrument::STAGE_FUNCTION,
    value::{StagedTable, StagedValue},
};

const STAGED_KEY: &str = "lunac.staged";
const LOADED_KEY: &str = "lunac.loaded";

/// Source text the interpreter runs for one module.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub display_path: String,
    pub source: String,
}

/// The embedded Lua VM used for one build.
///
/// Owns every piece of interpreter state: loaded modules, staged values and
/// finalize hooks all live inside it and go away when it is dropped, whether
/// the build succeeded or not.
pub struct Interpreter {
    lua: Lua,
    state: Rc<State>,
}

struct State {
    chunks: HashMap<String, Chunk>,
    store: ModuleStore,
    loading: RefCell<Vec<String>>,
    loaded: RefCell<HashSet<String>>,
    /// Innermost module whose execution raised the error being propagated.
    failed: RefCell<Option<String>>,
    stage_counts: RefCell<HashMap<(String, usize), usize>>,
    hooks: RefCell<Vec<(String, RegistryKey)>>,
    in_finalize: Cell<bool>,
}

impl Interpreter {
    pub fn new(
        src_dir: &Path,
        dst_dir: &Path,
        marker: &str,
        store: ModuleStore,
        chunks: HashMap<String, Chunk>,
    ) -> Result<Self, Box<Diagnostic>> {
        let lua = Lua::new();
        let state = Rc::new(State {
            chunks,
            store,
            loading: RefCell::new(Vec::new()),
            loaded: RefCell::new(HashSet::new()),
            failed: RefCell::new(None),
            stage_counts: RefCell::new(HashMap::new()),
            hooks: RefCell::new(Vec::new()),
            in_finalize: Cell::new(false),
        });

        install_environment(&lua, &state, src_dir, dst_dir, marker).map_err(|err| {
            Box::new(Diagnostic::make_global_error(
                &INTERPRETER_INIT_FAILED,
                &[&err.to_string()],
            ))
        })?;
        debug!("compile-time interpreter ready");

        Ok(Self { lua, state })
    }

    pub fn is_loaded(&self, module: &ModuleId) -> bool {
        self.state.loaded.borrow().contains(module.as_str())
    }

    /// Runs `module` through the compile-time `require`, unless something
    /// already required it.
    pub fn run_module(&self, module: &ModuleId) -> Result<(), Box<Diagnostic>> {
        if self.is_loaded(module) {
            return Ok(());
        }
        self.state.failed.replace(None);
        debug!(module = %module, "running module at compile time");
        match self.state.require(&self.lua, module.as_str()) {
            Ok(_) => Ok(()),
            Err(err) => {
                let failed = self
                    .state
                    .failed
                    .take()
                    .unwrap_or_else(|| module.to_string());
                Err(Box::new(self.eval_error(&failed, &err)))
            }
        }
    }

    /// Calls the `on_finalize` hooks in registration order.
    pub fn finalize(&self) -> Result<(), Box<Diagnostic>> {
        let hooks: Vec<(String, Function)> = {
            let hooks = self.state.hooks.borrow();
            let mut resolved = Vec::with_capacity(hooks.len());
            for (module, key) in hooks.iter() {
                let hook = self
                    .lua
                    .registry_value::<Function>(key)
                    .map_err(|err| Box::new(self.eval_error(module, &err)))?;
                resolved.push((module.clone(), hook));
            }
            resolved
        };

        debug!(hooks = hooks.len(), "running finalize hooks");
        self.state.in_finalize.set(true);
        let result = hooks
            .into_iter()
            .try_for_each(|(module, hook)| {
                hook.call::<()>(())
                    .map_err(|err| Box::new(self.eval_error(&module, &err)))
            });
        self.state.in_finalize.set(false);
        result
    }

    /// How many times site `ordinal` of `module` was evaluated.
    pub fn evaluation_count(&self, module: &str, ordinal: usize) -> usize {
        self.state
            .stage_counts
            .borrow()
            .get(&(module.to_string(), ordinal))
            .copied()
            .unwrap_or(0)
    }

    /// Detaches the value recorded for site `ordinal` of `module` from the
    /// interpreter. Tables are read as they are now, not as they were when
    /// the site ran.
    pub fn staged_value(&self, module: &str, ordinal: usize) -> Result<StagedValue, Box<Diagnostic>> {
        let read = || -> mlua::Result<StagedValue> {
            let staged: Table = self.lua.named_registry_value(STAGED_KEY)?;
            let value = match staged.raw_get::<Value>(module)? {
                Value::Table(sites) => sites.raw_get::<Value>(ordinal)?,
                _ => Value::Nil,
            };
            snapshot(&value, &mut Vec::new())
        };
        read().map_err(|err| Box::new(self.eval_error(module, &err)))
    }

    /// Reads a global, mainly for inspecting compile-time state in tests.
    pub fn global(&self, name: &str) -> Result<StagedValue, Box<Diagnostic>> {
        self.lua
            .globals()
            .raw_get::<Value>(name)
            .and_then(|value| snapshot(&value, &mut Vec::new()))
            .map_err(|err| {
                Box::new(Diagnostic::make_global_error(
                    &INTERPRETER_INIT_FAILED,
                    &[&err.to_string()],
                ))
            })
    }

    fn eval_error(&self, module: &str, err: &mlua::Error) -> Diagnostic {
        let display_path = self.state.display_path(module);
        let cause = err.to_string();
        let span = error_line(&cause, &display_path)
            .map(|line| {
                let at = Position::new(line, 0);
                Span::new(at, at)
            })
            .unwrap_or_default();
        Diagnostic::make_error(&COMPILETIME_EVAL, &[module, cause.trim_end()], display_path, span)
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.state.hooks.borrow_mut().clear();
        self.lua.expire_registry_values();
        trace!("compile-time interpreter released");
    }
}

impl State {
    fn display_path(&self, module: &str) -> String {
        match self.chunks.get(module) {
            Some(chunk) => chunk.display_path.clone(),
            None => ModuleId::parse(module)
                .map(|id| self.store.display_path(&id))
                .unwrap_or_else(|| module.to_string()),
        }
    }

    fn chunk(&self, module: &str) -> mlua::Result<Chunk> {
        if let Some(chunk) = self.chunks.get(module) {
            return Ok(chunk.clone());
        }
        let id = ModuleId::parse(module)
            .ok_or_else(|| mlua::Error::RuntimeError(format!("invalid module name '{module}'")))?;
        if !self.store.contains(&id) {
            return Err(mlua::Error::RuntimeError(format!("module '{module}' not found")));
        }
        let file = self
            .store
            .load(&id)
            .map_err(|diag| mlua::Error::RuntimeError(diag.message().unwrap_or_default().to_string()))?;
        Ok(Chunk {
            display_path: file.display_path,
            source: file.source,
        })
    }

    /// Compile-time `require`: runs a module once and caches its result.
    fn require(&self, lua: &Lua, module: &str) -> mlua::Result<Value> {
        let cache: Table = lua.named_registry_value(LOADED_KEY)?;
        if self.loaded.borrow().contains(module) {
            return cache.raw_get(module);
        }

        if self.loading.borrow().iter().any(|m| m == module) {
            let mut cycle = self.loading.borrow().clone();
            cycle.push(module.to_string());
            return Err(mlua::Error::RuntimeError(format!(
                "require cycle: {}",
                cycle.join(" -> ")
            )));
        }

        let chunk = self.chunk(module)?;
        self.loading.borrow_mut().push(module.to_string());
        let result = lua
            .load(chunk.source.as_str())
            .set_name(format!("@{}", chunk.display_path))
            .call::<Value>(module);
        self.loading.borrow_mut().pop();

        match result {
            Ok(value) => {
                self.failed.replace(None);
                cache.raw_set(module, value.clone())?;
                self.loaded.borrow_mut().insert(module.to_string());
                trace!(module, "module loaded");
                Ok(value)
            }
            Err(err) => {
                if self.failed.borrow().is_none() {
                    self.failed.replace(Some(module.to_string()));
                }
                Err(err)
            }
        }
    }

    fn record(&self, lua: &Lua, module: &str, ordinal: usize, value: Value) -> mlua::Result<()> {
        let count = {
            let mut counts = self.stage_counts.borrow_mut();
            let count = counts.entry((module.to_string(), ordinal)).or_insert(0);
            *count += 1;
            *count
        };
        if count > 1 {
            return Ok(());
        }

        let staged: Table = lua.named_registry_value(STAGED_KEY)?;
        let sites = match staged.raw_get::<Value>(module)? {
            Value::Table(sites) => sites,
            _ => {
                let sites = lua.create_table()?;
                staged.raw_set(module, sites.clone())?;
                sites
            }
        };
        sites.raw_set(ordinal, value)
    }

    fn current_module(&self) -> String {
        self.loading.borrow().last().cloned().unwrap_or_default()
    }
}

fn install_environment(
    lua: &Lua,
    state: &Rc<State>,
    src_dir: &Path,
    dst_dir: &Path,
    marker: &str,
) -> mlua::Result<()> {
    lua.set_named_registry_value(STAGED_KEY, lua.create_table()?)?;
    lua.set_named_registry_value(LOADED_KEY, lua.create_table()?)?;

    let globals = lua.globals();
    globals.set("__src_dir", src_dir.to_string_lossy().into_owned())?;
    globals.set("__dst_dir", dst_dir.to_string_lossy().into_owned())?;

    let require_state = Rc::clone(state);
    globals.set(
        "require",
        lua.create_function(move |lua, module: String| require_state.require(lua, &module))?,
    )?;

    let stage_state = Rc::clone(state);
    globals.set(
        STAGE_FUNCTION,
        lua.create_function(move |lua, (module, ordinal, value): (String, usize, Value)| {
            let value = resolve_marker_argument(value)?;
            stage_state.record(lua, &module, ordinal, value.clone())?;
            Ok(value)
        })?,
    )?;

    globals.set(
        marker,
        lua.create_function(|_, value: Value| resolve_marker_argument(value))?,
    )?;

    let hook_state = Rc::clone(state);
    globals.set(
        "on_finalize",
        lua.create_function(move |lua, hook: Function| {
            if hook_state.in_finalize.get() {
                return Err(mlua::Error::RuntimeError(
                    "on_finalize cannot be called from a finalize hook".to_string(),
                ));
            }
            let key = lua.create_registry_value(hook)?;
            let module = hook_state.current_module();
            hook_state.hooks.borrow_mut().push((module, key));
            Ok(())
        })?,
    )?;

    Ok(())
}

/// `compiletime(f)` stands for the result of `f()`; any other argument is
/// taken as is.
fn resolve_marker_argument(value: Value) -> mlua::Result<Value> {
    match value {
        Value::Function(function) => function.call::<Value>(()),
        other => Ok(other),
    }
}

/// Copies a Lua value out of the VM. `seen` holds the tables currently being
/// copied so a table that contains itself becomes opaque instead of looping.
fn snapshot(value: &Value, seen: &mut Vec<*const c_void>) -> mlua::Result<StagedValue> {
    Ok(match value {
        Value::Nil => StagedValue::Nil,
        Value::Boolean(b) => StagedValue::Boolean(*b),
        Value::Integer(i) => StagedValue::Integer(*i),
        Value::Number(n) => StagedValue::Number(*n),
        Value::String(s) => StagedValue::String(s.as_bytes().to_vec()),
        Value::Table(table) => {
            let pointer = table.to_pointer();
            if seen.contains(&pointer) {
                return Ok(StagedValue::Opaque {
                    type_name: "recursive table".to_string(),
                });
            }
            seen.push(pointer);
            let mut pairs = Vec::new();
            for pair in table.clone().pairs::<Value, Value>() {
                let (key, value) = pair?;
                pairs.push((snapshot(&key, seen)?, snapshot(&value, seen)?));
            }
            seen.pop();
            StagedValue::Table(StagedTable::from_pairs(pairs))
        }
        other => StagedValue::Opaque {
            type_name: other.type_name().to_string(),
        },
    })
}

/// Finds the line in a Lua error message such as `units.lua:12: boom`.
fn error_line(message: &str, display_path: &str) -> Option<usize> {
    let needle = format!("{display_path}:");
    let start = message.find(&needle)? + needle.len();
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_line_reads_chunk_position() {
        assert_eq!(
            error_line("runtime error: units.lua:12: boom", "units.lua"),
            Some(12)
        );
        assert_eq!(error_line("boom", "units.lua"), None);
    }

    #[test]
    fn snapshot_copies_nested_tables() {
        let lua = Lua::new();
        let value: Value = lua
            .load("return { 1, 2, name = 'x', inner = { true } }")
            .eval()
            .unwrap();
        let staged = snapshot(&value, &mut Vec::new()).unwrap();
        let StagedValue::Table(table) = staged else {
            panic!("expected a table");
        };
        assert_eq!(
            table.array,
            vec![StagedValue::Integer(1), StagedValue::Integer(2)]
        );
        assert_eq!(table.hash.len(), 2);
    }

    #[test]
    fn snapshot_marks_self_reference_opaque() {
        let lua = Lua::new();
        let value: Value = lua.load("local t = {} t.self = t return t").eval().unwrap();
        let staged = snapshot(&value, &mut Vec::new()).unwrap();
        let StagedValue::Table(table) = staged else {
            panic!("expected a table");
        };
        assert_eq!(
            table.hash[0].1,
            StagedValue::Opaque {
                type_name: "recursive table".to_string()
            }
        );
    }

    #[test]
    fn functions_are_opaque() {
        let lua = Lua::new();
        let value: Value = lua.load("return print").eval().unwrap();
        let staged = snapshot(&value, &mut Vec::new()).unwrap();
        assert_eq!(staged.type_name(), "function");
    }
}
