//! # The Container — heart of Mawrid
//!
//! Resolves type identifiers into instances by recursively building
//! their constructor dependencies, and caches every result.
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Container ──into_shared()──> SharedContainer
//!                                    │
//!                                 get(key)
//!                                    │
//!                     cached? ──yes──┴──no──> build(key)
//!                                               │
//!                              Introspector::describe(key)
//!                                               │
//!                              get(dependency) for each parameter
//!                                               │
//!                              TypeDescriptor::construct(args)
//! ```
//!
//! # Examples
//! ```rust
//! use mawrid_container::prelude::*;
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, msg: &str);
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, msg: &str) { println!("{msg}"); }
//! }
//!
//! struct UserService {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! let mut catalog = TypeCatalog::new();
//! catalog.insert(
//!     TypeDescriptor::of::<UserService>(|mut args| {
//!         Ok(Instance::new(UserService { logger: args.shared::<dyn Logger>()? }))
//!     })
//!     .with_parameter(Parameter::single("logger", DependencyKey::of::<dyn Logger>())),
//! );
//!
//! let mut container = Container::builder()
//!     .catalog(catalog)
//!     .bind::<dyn Logger>(Arc::new(ConsoleLogger))
//!     .build();
//!
//! let service: Arc<UserService> = container.resolve().expect("Failed to resolve");
//! service.logger.log("ready");
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, instrument, trace, warn};

use mawrid_support::rendering::suggest_similar;

use crate::catalog::TypeCatalog;
use crate::config::ContainerSettings;
use crate::error::{
    BuildError, BuildFailure, CircularDependencyError, MawridError, NotFoundError, Result,
};
use crate::instance::{Arguments, Instance};
use crate::introspect::{Introspector, ParameterType, TypeDescriptor};
use crate::key::DependencyKey;
use crate::registry::{InstanceRegistry, Origin};

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] with its introspector, settings and
/// pre-registered instances.
///
/// Without an explicit introspector the container uses
/// [`TypeCatalog::global`], i.e. every `#[derive(Injectable)]` type.
pub struct ContainerBuilder {
    introspector: Option<Arc<dyn Introspector>>,
    instances: Vec<(DependencyKey, Instance)>,
    settings: ContainerSettings,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            introspector: None,
            instances: Vec::new(),
            settings: ContainerSettings::default(),
        }
    }

    /// Use `catalog` to describe types.
    pub fn catalog(self, catalog: TypeCatalog) -> Self {
        self.introspector(catalog)
    }

    /// Use a custom [`Introspector`].
    pub fn introspector(mut self, introspector: impl Introspector + 'static) -> Self {
        self.introspector = Some(Arc::new(introspector));
        self
    }

    /// Pre-register `instance` under `key`.
    pub fn instance(mut self, key: impl Into<DependencyKey>, instance: Instance) -> Self {
        self.instances.push((key.into(), instance));
        self
    }

    /// Pre-register an owned value under its own type.
    pub fn value<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.instance(DependencyKey::of::<T>(), Instance::new(value))
    }

    /// Pre-register a shared value, typically a trait object, under `I`.
    pub fn bind<I: ?Sized + Send + Sync + 'static>(self, value: Arc<I>) -> Self {
        self.instance(DependencyKey::of::<I>(), Instance::from_arc(value))
    }

    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.settings.max_suggestions = max;
        self
    }

    pub fn build(self) -> Container {
        let introspector = self
            .introspector
            .unwrap_or_else(|| TypeCatalog::global() as Arc<dyn Introspector>);

        let mut registry = InstanceRegistry::new();
        for (key, instance) in self.instances {
            registry.insert(key, instance, Origin::Registered);
        }

        debug!(registered = registry.len(), "Container ready");
        Container {
            registry,
            introspector,
            resolving: Vec::new(),
            settings: self.settings,
        }
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Dependency resolution container.
///
/// Single-threaded by design: resolution takes `&mut self`. Use
/// [`SharedContainer`] to share one container between threads.
pub struct Container {
    registry: InstanceRegistry,
    introspector: Arc<dyn Introspector>,
    /// Identifiers currently being built, outermost first.
    resolving: Vec<DependencyKey>,
    settings: ContainerSettings,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates a container over the global derive catalog.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn with_introspector(introspector: impl Introspector + 'static) -> Self {
        Self::builder().introspector(introspector).build()
    }

    /// Stores `instance` under `key`, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<DependencyKey>, instance: Instance) {
        self.registry.insert(key.into(), instance, Origin::Registered);
    }

    /// Registers an owned value under its own type.
    pub fn register_value<T: Send + Sync + 'static>(&mut self, value: T) {
        self.register(DependencyKey::of::<T>(), Instance::new(value));
    }

    /// Registers a shared value under `I`, e.g. `bind::<dyn Logger>(..)`.
    pub fn bind<I: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<I>) {
        self.register(DependencyKey::of::<I>(), Instance::from_arc(value));
    }

    /// Returns `true` if `key` is cached or can be built.
    ///
    /// Never constructs or caches anything.
    pub fn has(&self, key: &DependencyKey) -> bool {
        self.has_in(key, &mut Vec::new())
    }

    /// Typed form of [`has`](Self::has).
    pub fn provides<T: ?Sized + 'static>(&self) -> bool {
        self.has(&DependencyKey::of::<T>())
    }

    /// Returns `true` if an instance is already cached for `key`.
    pub fn is_resolved(&self, key: &DependencyKey) -> bool {
        self.registry.contains(key)
    }

    /// Returns the instance for `key`, building and caching it on first use.
    ///
    /// # Errors
    /// - [`MawridError::NotFound`]: `key` is not registered and cannot be built
    /// - [`MawridError::BuildFailed`]: `key` is buildable but construction failed
    /// - [`MawridError::CircularDependency`]: `key` depends on itself
    #[instrument(level = "debug", skip_all, fields(key = %key))]
    pub fn get(&mut self, key: &DependencyKey) -> Result<Instance> {
        if let Some(instance) = self.registry.get(key) {
            trace!("Cache hit");
            return Ok(instance.clone());
        }

        if let Some(start) = self.resolving.iter().position(|k| k == key) {
            let mut chain = self.resolving[start..].to_vec();
            chain.push(key.clone());

            warn!(cycle = ?chain, "Circular dependency detected!");
            return Err(MawridError::CircularDependency(CircularDependencyError {
                key: key.clone(),
                chain,
            }));
        }

        let depth = self.resolving.len();
        self.resolving.push(key.clone());
        let built = panic::catch_unwind(AssertUnwindSafe(|| self.build(key)));
        self.resolving.truncate(depth);

        let built = match built {
            Ok(built) => built,
            Err(payload) => panic::resume_unwind(payload),
        };

        match built {
            Ok(instance) => {
                debug!(ty = instance.type_name(), "Built");
                Ok(instance)
            }
            Err(err @ MawridError::CircularDependency(_)) => Err(err),
            Err(err) if self.can_build(key, &mut Vec::new()) => {
                debug!(error = %err, "Build of feasible type failed");
                Err(err)
            }
            Err(err) => {
                debug!(error = %err, "Not resolvable");
                Err(MawridError::NotFound(NotFoundError {
                    requested: key.clone(),
                    required_by: self.resolving.last().cloned(),
                    suggestions: self.suggestions(key),
                    cause: Some(Box::new(err)),
                }))
            }
        }
    }

    /// Resolves `T` and extracts it as `Arc<T>`.
    ///
    /// ```rust,ignore
    /// let db: Arc<Database> = container.resolve()?;
    /// let logger: Arc<dyn Logger> = container.resolve()?;
    /// ```
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<T>> {
        let key = DependencyKey::of::<T>();
        trace!(key = %key, "Resolving");

        let instance = self.get(&key)?;
        instance
            .downcast::<T>()
            .ok_or_else(|| MawridError::TypeMismatch {
                key,
                expected: type_name::<T>(),
                found: instance.type_name(),
            })
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// Wraps the container for use from several threads.
    pub fn into_shared(self) -> SharedContainer {
        SharedContainer::new(self)
    }

    // ── Feasibility probing ──
    //
    // `has_in` and `can_build` recurse into each other. `probing` holds the
    // identifiers on the current probe path; re-entering one is a cycle and
    // that branch is infeasible.

    fn has_in(&self, key: &DependencyKey, probing: &mut Vec<DependencyKey>) -> bool {
        self.registry.contains(key) || self.can_build(key, probing)
    }

    fn can_build(&self, key: &DependencyKey, probing: &mut Vec<DependencyKey>) -> bool {
        if probing.contains(key) {
            trace!(key = %key, "Probe re-entered identifier");
            return false;
        }

        probing.push(key.clone());
        let feasible = match self.describe(key) {
            Ok(descriptor) => match self.requirements(&descriptor, probing) {
                Ok(required) => required.iter().all(|dep| self.has_in(dep, probing)),
                Err(_) => false,
            },
            Err(_) => false,
        };
        probing.pop();

        trace!(key = %key, feasible, "Probed");
        feasible
    }

    // ── Building ──

    fn describe(&self, key: &DependencyKey) -> std::result::Result<Arc<TypeDescriptor>, BuildError> {
        self.introspector
            .describe(key)
            .map_err(|err| BuildError::new(key.clone(), BuildFailure::Introspection(err)))
    }

    /// Maps each parameter to the identifier that will satisfy it.
    fn requirements(
        &self,
        descriptor: &TypeDescriptor,
        probing: &mut Vec<DependencyKey>,
    ) -> std::result::Result<Vec<DependencyKey>, BuildError> {
        let mut required = Vec::with_capacity(descriptor.parameters().len());

        for parameter in descriptor.parameters() {
            let key = match parameter.ty() {
                ParameterType::Untyped => {
                    return Err(BuildError::new(
                        descriptor.key().clone(),
                        BuildFailure::UntypedParameter {
                            parameter: parameter.name().to_owned(),
                        },
                    ));
                }
                ParameterType::Single(key) => key.clone(),
                ParameterType::Union(alternatives) => {
                    let mut chosen = None;
                    for alternative in alternatives {
                        if self.has_in(alternative, probing) {
                            chosen = Some(alternative.clone());
                            break;
                        }
                    }

                    match chosen {
                        Some(key) => {
                            trace!(parameter = parameter.name(), chosen = %key, "Union alternative selected");
                            key
                        }
                        None => {
                            return Err(BuildError::new(
                                descriptor.key().clone(),
                                BuildFailure::NoViableAlternative {
                                    parameter: parameter.name().to_owned(),
                                    candidates: alternatives.clone(),
                                },
                            ));
                        }
                    }
                }
            };
            required.push(key);
        }

        Ok(required)
    }

    fn build(&mut self, key: &DependencyKey) -> Result<Instance> {
        let descriptor = self.describe(key)?;
        // Alternatives leading back into an identifier under construction
        // are not viable.
        let mut probing = self.resolving.clone();
        let required = self.requirements(&descriptor, &mut probing)?;

        let mut arguments = Vec::with_capacity(required.len());
        for dependency in required {
            let instance = self.get(&dependency).map_err(|err| match err {
                MawridError::BuildFailed(_) | MawridError::CircularDependency(_) => err,
                other => BuildError::new(
                    key.clone(),
                    BuildFailure::Dependency {
                        key: dependency.clone(),
                        source: Box::new(other),
                    },
                )
                .into(),
            })?;
            arguments.push((dependency, instance));
        }

        let arguments = Arguments::new(key.clone(), arguments);
        let instance = panic::catch_unwind(AssertUnwindSafe(|| descriptor.construct(arguments)))
            .unwrap_or_else(|payload| {
                warn!(key = %key, "Constructor panicked");
                Err(panic_message(payload.as_ref()).into())
            })
            .map_err(|source| BuildError::new(key.clone(), BuildFailure::Constructor(source)))?;

        self.registry
            .insert(key.clone(), instance.clone(), Origin::Built);
        Ok(instance)
    }

    fn suggestions(&self, key: &DependencyKey) -> Vec<String> {
        if self.settings.max_suggestions == 0 {
            return Vec::new();
        }

        let mut known = self.introspector.known_keys();
        known.extend(self.registry.keys().cloned());
        known.sort();
        known.dedup();

        let names: Vec<&str> = known.iter().map(DependencyKey::name).collect();
        suggest_similar(key.name(), &names, self.settings.max_suggestions)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("constructor panicked: {detail}")
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("resolved", &self.registry.len())
            .field("settings", &self.settings)
            .finish()
    }
}

// ═══════════════════════════════════════════
// SharedContainer
// ═══════════════════════════════════════════

/// A [`Container`] behind a mutex, clonable across threads.
///
/// Every call locks for its whole duration, so resolution keeps the
/// single-threaded semantics of the inner container.
#[derive(Clone)]
pub struct SharedContainer {
    inner: Arc<Mutex<Container>>,
}

impl SharedContainer {
    pub fn new(container: Container) -> Self {
        Self {
            inner: Arc::new(Mutex::new(container)),
        }
    }

    pub fn register(&self, key: impl Into<DependencyKey>, instance: Instance) {
        self.inner.lock().register(key, instance);
    }

    pub fn has(&self, key: &DependencyKey) -> bool {
        self.inner.lock().has(key)
    }

    pub fn get(&self, key: &DependencyKey) -> Result<Instance> {
        self.inner.lock().get(key)
    }

    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.inner.lock().resolve::<T>()
    }

    /// Locks the container for a batch of operations.
    pub fn lock(&self) -> MutexGuard<'_, Container> {
        self.inner.lock()
    }
}

impl From<Container> for SharedContainer {
    fn from(container: Container) -> Self {
        Self::new(container)
    }
}

impl fmt::Debug for SharedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedContainer").finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder, SharedContainer};
    pub use crate::catalog::{Injectable, TypeCatalog};
    pub use crate::config::ContainerSettings;
    pub use crate::error::{MawridError, Result};
    pub use crate::instance::{Arguments, BoxError, Instance};
    pub use crate::introspect::{Introspector, Parameter, ParameterType, TypeDescriptor};
    pub use crate::key::DependencyKey;
    pub use crate::provider::{Provider, ProviderRegistry};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::Parameter;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Dependency;

    struct ClassWithDependency {
        dependency: Arc<Dependency>,
    }

    struct Holder {
        value: Instance,
    }

    trait DummyInterface: Send + Sync {
        fn id(&self) -> u32;
    }

    struct DummyImpl(u32);

    impl DummyInterface for DummyImpl {
        fn id(&self) -> u32 {
            self.0
        }
    }

    struct Controller {
        sub: Arc<dyn DummyInterface>,
    }

    fn dependency() -> TypeDescriptor {
        TypeDescriptor::of::<Dependency>(|_| Ok(Instance::new(Dependency)))
    }

    fn counted_dependency(counter: Arc<AtomicU32>) -> TypeDescriptor {
        TypeDescriptor::of::<Dependency>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Instance::new(Dependency))
        })
    }

    fn class_with_dependency() -> TypeDescriptor {
        TypeDescriptor::of::<ClassWithDependency>(|mut args| {
            Ok(Instance::new(ClassWithDependency {
                dependency: args.shared::<Dependency>()?,
            }))
        })
        .with_parameter(Parameter::single("dependency", DependencyKey::of::<Dependency>()))
    }

    fn holder(parameter: Parameter) -> TypeDescriptor {
        TypeDescriptor::of::<Holder>(|mut args| {
            Ok(Instance::new(Holder {
                value: args.instance()?,
            }))
        })
        .with_parameter(parameter)
    }

    fn controller() -> TypeDescriptor {
        TypeDescriptor::of::<Controller>(|mut args| {
            Ok(Instance::new(Controller {
                sub: args.shared::<dyn DummyInterface>()?,
            }))
        })
        .with_parameter(Parameter::single("sub", DependencyKey::of::<dyn DummyInterface>()))
    }

    fn container_with(descriptors: Vec<TypeDescriptor>) -> Container {
        let mut catalog = TypeCatalog::new();
        for descriptor in descriptors {
            catalog.insert(descriptor);
        }
        Container::builder().catalog(catalog).build()
    }

    fn key<T: ?Sized + 'static>() -> DependencyKey {
        DependencyKey::of::<T>()
    }

    #[test]
    fn builds_zero_argument_type() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut container = container_with(vec![counted_dependency(counter.clone())]);

        let first = container.get(&key::<Dependency>()).unwrap();
        let second = container.get(&key::<Dependency>()).unwrap();

        assert!(first.is::<Dependency>());
        assert!(first.ptr_eq(&second));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn has_probes_without_constructing() {
        let counter = Arc::new(AtomicU32::new(0));
        let container = container_with(vec![counted_dependency(counter.clone()), class_with_dependency()]);

        assert!(container.has(&key::<Dependency>()));
        assert!(container.provides::<ClassWithDependency>());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(container.is_empty());
    }

    #[test]
    fn resolves_transitive_dependency() {
        let mut container = container_with(vec![dependency(), class_with_dependency()]);

        let class: Arc<ClassWithDependency> = container.resolve().unwrap();
        let dependency: Arc<Dependency> = container.resolve().unwrap();

        assert!(Arc::ptr_eq(&class.dependency, &dependency));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn registration_takes_precedence() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut container = container_with(vec![counted_dependency(counter.clone())]);

        let registered = Instance::new(Dependency);
        container.register(key::<Dependency>(), registered.clone());

        let resolved = container.get(&key::<Dependency>()).unwrap();
        assert!(resolved.ptr_eq(&registered));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn register_overwrites_previous_entry() {
        let mut container = container_with(vec![]);
        container.register("app::Port", Instance::new(80u16));
        container.register("app::Port", Instance::new(8080u16));

        let port = container.get(&DependencyKey::new("app::Port")).unwrap();
        assert_eq!(*port.downcast::<u16>().unwrap(), 8080);
    }

    #[test]
    fn bound_interface_satisfies_dependency() {
        let mut container = container_with(vec![controller()]);
        assert!(!container.provides::<Controller>());

        container.bind::<dyn DummyInterface>(Arc::new(DummyImpl(7)));
        assert!(container.provides::<Controller>());

        let controller: Arc<Controller> = container.resolve().unwrap();
        assert_eq!(controller.sub.id(), 7);
    }

    #[test]
    fn primitive_parameters_are_unsatisfiable() {
        let primitives = [
            key::<String>(),
            key::<i32>(),
            key::<Vec<u8>>(),
            key::<bool>(),
            key::<f64>(),
            key::<dyn std::any::Any + Send + Sync>(),
        ];

        for primitive in primitives {
            let mut container = container_with(vec![holder(Parameter::single("value", primitive.clone()))]);

            assert!(!container.provides::<Holder>(), "{primitive} should be unsatisfiable");
            let err = container.get(&key::<Holder>()).unwrap_err();
            assert!(err.is_not_found(), "{primitive}: expected NotFound, got {err:?}");
        }
    }

    #[test]
    fn union_picks_first_resolvable_alternative() {
        let mut container = container_with(vec![
            dependency(),
            holder(Parameter::union("dependency", vec![key::<String>(), key::<Dependency>()])),
        ]);

        let holder: Arc<Holder> = container.resolve().unwrap();
        assert!(holder.value.is::<Dependency>());
    }

    #[test]
    fn union_respects_declaration_order() {
        let mut container = container_with(vec![
            dependency(),
            holder(Parameter::union("dependency", vec![key::<dyn DummyInterface>(), key::<Dependency>()])),
        ]);
        container.bind::<dyn DummyInterface>(Arc::new(DummyImpl(1)));

        let holder: Arc<Holder> = container.resolve().unwrap();
        assert!(holder.value.is::<dyn DummyInterface>());
    }

    #[test]
    fn union_without_resolvable_alternative_fails() {
        let mut container = container_with(vec![holder(Parameter::union(
            "dependency",
            vec![key::<String>(), key::<i32>()],
        ))]);

        assert!(!container.provides::<Holder>());
        let err = container.get(&key::<Holder>()).unwrap_err();
        assert!(err.is_build_failure());

        match err.build_error().map(|e| &e.reason) {
            Some(BuildFailure::NoViableAlternative { parameter, candidates }) => {
                assert_eq!(parameter, "dependency");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("Expected NoViableAlternative, got: {other:?}"),
        }
    }

    #[test]
    fn untyped_parameter_fails() {
        let mut container = container_with(vec![holder(Parameter::untyped("dependency"))]);

        let err = container.get(&key::<Holder>()).unwrap_err();
        assert!(err.is_build_failure());
        assert!(matches!(
            err.build_error().map(|e| &e.reason),
            Some(BuildFailure::UntypedParameter { .. })
        ));
    }

    #[test]
    fn constructor_errors_are_wrapped() {
        let mut container = container_with(vec![TypeDescriptor::of::<Dependency>(|_| {
            Err("connection refused".into())
        })]);

        assert!(container.provides::<Dependency>());
        let err = container.get(&key::<Dependency>()).unwrap_err();

        assert!(!err.is_not_found());
        match err {
            MawridError::BuildFailed(BuildError {
                reason: BuildFailure::Constructor(source),
                ..
            }) => assert_eq!(source.to_string(), "connection refused"),
            other => panic!("Expected constructor failure, got: {other:?}"),
        }
        assert!(!container.is_resolved(&key::<Dependency>()));
    }

    #[test]
    fn constructor_panic_becomes_build_failure() {
        let mut container = container_with(vec![
            TypeDescriptor::of::<Dependency>(|_| panic!("boom")),
            class_with_dependency(),
        ]);

        for _ in 0..2 {
            match container.get(&key::<Dependency>()).unwrap_err() {
                MawridError::BuildFailed(BuildError {
                    reason: BuildFailure::Constructor(source),
                    ..
                }) => assert!(source.to_string().contains("boom")),
                other => panic!("Expected constructor failure, got: {other:?}"),
            }
        }

        let err = container.get(&key::<ClassWithDependency>()).unwrap_err();
        assert!(err.is_build_failure());
        assert!(!matches!(err, MawridError::CircularDependency(_)));
        assert!(container.is_empty());
    }

    #[test]
    fn introspector_panic_leaves_container_usable() {
        struct Exploding;

        impl Introspector for Exploding {
            fn describe(
                &self,
                key: &DependencyKey,
            ) -> std::result::Result<Arc<TypeDescriptor>, crate::introspect::IntrospectionError>
            {
                if key.name() == "app::Exploding" {
                    panic!("introspection exploded");
                }
                Ok(Arc::new(dependency()))
            }
        }

        let shared = Container::with_introspector(Exploding).into_shared();
        let exploding = DependencyKey::new("app::Exploding");

        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| shared.get(&exploding)));
        assert!(outcome.is_err());

        // the resolution stack was unwound with the panic
        assert!(shared.lock().resolving.is_empty());
        assert!(shared.get(&key::<Dependency>()).is_ok());
    }

    #[test]
    fn argument_mismatch_is_a_constructor_failure() {
        let mut container = container_with(vec![
            TypeDescriptor::of::<ClassWithDependency>(|mut args| {
                Ok(Instance::new(ClassWithDependency {
                    dependency: args.shared::<Dependency>()?,
                }))
            })
            .with_parameter(Parameter::single("dependency", key::<DummyImpl>())),
            TypeDescriptor::of::<DummyImpl>(|_| Ok(Instance::new(DummyImpl(0)))),
        ]);

        let err = container.get(&key::<ClassWithDependency>()).unwrap_err();
        assert!(matches!(
            err,
            MawridError::BuildFailed(BuildError { reason: BuildFailure::Constructor(_), .. })
        ));
    }

    #[test]
    fn missing_dependency_is_not_found() {
        let mut container = container_with(vec![class_with_dependency()]);

        let err = container.get(&key::<ClassWithDependency>()).unwrap_err();
        let MawridError::NotFound(not_found) = err else {
            panic!("Expected NotFound");
        };
        assert_eq!(not_found.requested, key::<ClassWithDependency>());

        // the cause chain records the missing dependency and who needed it
        match not_found.cause.as_deref() {
            Some(MawridError::BuildFailed(BuildError {
                reason: BuildFailure::Dependency { source, .. },
                ..
            })) => match source.as_ref() {
                MawridError::NotFound(inner) => {
                    assert_eq!(inner.requested, key::<Dependency>());
                    assert_eq!(inner.required_by, Some(key::<ClassWithDependency>()));
                }
                other => panic!("Expected nested NotFound, got: {other:?}"),
            },
            other => panic!("Expected dependency failure, got: {other:?}"),
        }
    }

    #[test]
    fn dependency_build_failure_propagates_unchanged() {
        let mut container = container_with(vec![
            TypeDescriptor::of::<Dependency>(|_| Err("boom".into())),
            class_with_dependency(),
        ]);

        let err = container.get(&key::<ClassWithDependency>()).unwrap_err();
        assert!(err.is_build_failure());
        assert_eq!(err.key(), &key::<Dependency>());
        assert!(!container.is_resolved(&key::<ClassWithDependency>()));
    }

    #[test]
    fn failed_build_leaves_no_partial_instance() {
        struct Failing;

        let mut container = container_with(vec![
            dependency(),
            TypeDescriptor::of::<Failing>(|_| Err("nope".into())),
            TypeDescriptor::of::<Holder>(|_| Ok(Instance::new(())))
                .with_parameter(Parameter::single("a", key::<Dependency>()))
                .with_parameter(Parameter::single("b", key::<Failing>())),
        ]);

        assert!(container.get(&key::<Holder>()).is_err());
        assert!(container.is_resolved(&key::<Dependency>()));
        assert!(!container.is_resolved(&key::<Failing>()));
        assert!(!container.is_resolved(&key::<Holder>()));
    }

    #[test]
    fn cycles_are_detected() {
        let a = DependencyKey::new("app::A");
        let b = DependencyKey::new("app::B");

        let mut container = container_with(vec![
            TypeDescriptor::new(a.clone(), |_| Ok(Instance::new(())))
                .with_parameter(Parameter::single("b", b.clone())),
            TypeDescriptor::new(b.clone(), |_| Ok(Instance::new(())))
                .with_parameter(Parameter::single("a", a.clone())),
        ]);

        assert!(!container.has(&a));

        match container.get(&a).unwrap_err() {
            MawridError::CircularDependency(err) => {
                assert_eq!(err.chain, vec![a.clone(), b.clone(), a.clone()]);
            }
            other => panic!("Expected CircularDependency, got: {other:?}"),
        }
        assert!(container.is_empty());
    }

    #[test]
    fn union_skips_cyclic_alternative() {
        let a = DependencyKey::new("app::A");

        let mut container = container_with(vec![
            dependency(),
            TypeDescriptor::new(a.clone(), |mut args| args.instance().map_err(Into::into))
                .with_parameter(Parameter::union("next", vec![a.clone(), key::<Dependency>()])),
        ]);

        let instance = container.get(&a).unwrap();
        assert!(instance.is::<Dependency>());
    }

    #[test]
    fn string_identifiers_resolve() {
        let clock = DependencyKey::new("app::Clock");
        let mut container = container_with(vec![TypeDescriptor::new(clock.clone(), |_| {
            Ok(Instance::new(1_700_000_000u64))
        })]);

        let instance = container.get(&clock).unwrap();
        assert_eq!(*instance.downcast::<u64>().unwrap(), 1_700_000_000);
    }

    #[test]
    fn resolve_reports_type_mismatch() {
        let mut container = container_with(vec![]);
        container.register(key::<Dependency>(), Instance::new(5u8));

        match container.resolve::<Dependency>() {
            Err(MawridError::TypeMismatch { found, .. }) => assert_eq!(found, "u8"),
            other => panic!("Expected TypeMismatch, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn not_found_suggests_similar_types() {
        let mut container = container_with(vec![dependency()]);

        let err = container.get(&DependencyKey::new("Dependancy")).unwrap_err();
        let MawridError::NotFound(not_found) = err else {
            panic!("Expected NotFound");
        };
        assert_eq!(not_found.suggestions, vec![key::<Dependency>().name().to_string()]);
    }

    #[test]
    fn suggestions_can_be_disabled() {
        let mut catalog = TypeCatalog::new();
        catalog.insert(dependency());
        let mut container = Container::builder().catalog(catalog).max_suggestions(0).build();

        let err = container.get(&DependencyKey::new("Dependancy")).unwrap_err();
        let MawridError::NotFound(not_found) = err else {
            panic!("Expected NotFound");
        };
        assert!(not_found.suggestions.is_empty());
    }

    #[test]
    fn builder_preregisters_instances() {
        let mut catalog = TypeCatalog::new();
        catalog.insert(controller());

        let mut container = Container::builder()
            .catalog(catalog)
            .value(Dependency)
            .bind::<dyn DummyInterface>(Arc::new(DummyImpl(3)))
            .build();

        assert_eq!(container.len(), 2);
        assert_eq!(container.resolve::<Controller>().unwrap().sub.id(), 3);
    }

    #[test]
    fn shared_container_resolves_across_threads() {
        let shared = container_with(vec![dependency(), class_with_dependency()]).into_shared();

        let handle = {
            let shared = shared.clone();
            std::thread::spawn(move || shared.resolve::<ClassWithDependency>().unwrap())
        };
        let from_thread = handle.join().unwrap();
        let local: Arc<ClassWithDependency> = shared.resolve().unwrap();

        assert!(Arc::ptr_eq(&from_thread, &local));
        assert!(shared.has(&key::<Dependency>()));
    }

    #[test]
    fn debug_display() {
        let mut container = container_with(vec![dependency()]);
        container.get(&key::<Dependency>()).unwrap();

        let debug = format!("{container:?}");
        assert!(debug.contains("Container"));
        assert!(debug.contains("resolved: 1"));
    }
}
