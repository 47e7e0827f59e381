//! Integration tests for the runtime load/reset lifecycle

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use prefab::{FactoryError, Runtime};

#[derive(Debug, Default, Clone, PartialEq)]
enum Role {
    #[default]
    Anonymous,
    User,
    Admin,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct User {
    name: String,
    role: Role,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Team {
    label: String,
}

fn install_defaults(runtime: &mut Runtime) {
    runtime.define::<User>(|_, user| {
        user.name = "Malcom".to_string();
        user.role = Role::User;
        Ok(())
    });
    runtime.define_as::<User>("admin", |_, user| {
        user.role = Role::Admin;
        Ok(())
    });
    runtime.define::<Team>(|_, team| {
        team.label = "core".to_string();
        Ok(())
    });
}

fn install_custom(runtime: &mut Runtime) {
    runtime.define::<User>(|_, user| {
        user.name = "Empty".to_string();
        user.role = Role::Admin;
        Ok(())
    });
}

fn runtime_with_sources() -> Runtime {
    let mut runtime = Runtime::new();
    runtime.install_source(install_defaults);
    runtime.install_source_as("custom", install_custom);
    runtime
}

#[test]
fn test_load_populates_the_registry() {
    let mut runtime = runtime_with_sources();
    runtime.load().expect("Should load");
    assert_eq!(runtime.templates().len(), 3);
}

#[test]
fn test_load_specific_source() {
    let mut runtime = runtime_with_sources();
    runtime.load().expect("Should load");

    runtime.reset();
    runtime.load_from("custom").expect("Should load custom");
    assert_eq!(runtime.templates().len(), 1);

    let user = runtime.build::<User>().to_one().expect("Should build");
    assert_eq!(user.name, "Empty");
    assert_eq!(user.role, Role::Admin);
}

#[test]
fn test_loading_again_augments_and_replaces() {
    let mut runtime = runtime_with_sources();
    runtime.load().expect("Should load");
    runtime.load_from("custom").expect("Should load custom");

    // custom's default User template replaced the earlier one; everything
    // else survived the second load
    assert_eq!(runtime.templates().len(), 3);
    let user = runtime.build::<User>().to_one().expect("Should build");
    assert_eq!(user.name, "Empty");
}

#[test]
fn test_load_from_unknown_source() {
    let mut runtime = runtime_with_sources();
    let error = runtime.load_from("nope").err().expect("Should fail");
    assert!(matches!(
        error,
        FactoryError::SourceNotFound { ref name } if name == "nope"
    ));
    insta::assert_snapshot!(error, @r#"no definition source installed under name "nope""#);
}

#[test]
fn test_reset_then_build_fails() {
    let mut runtime = runtime_with_sources();
    runtime.load().expect("Should load");
    runtime.reset();

    let result = runtime.build::<User>().to_one();
    assert!(matches!(
        result,
        Err(FactoryError::TemplateNotFound { ref identifier, .. }) if identifier.is_empty()
    ));
}

#[test]
fn test_unknown_identifier_fails_despite_default() {
    let mut runtime = runtime_with_sources();
    runtime.load().expect("Should load");

    let result = runtime.build::<User>().template("nope").to_one();
    assert!(matches!(
        result,
        Err(FactoryError::TemplateNotFound { ref identifier, .. }) if identifier == "nope"
    ));
}

#[test]
fn test_reset_clears_hooks() {
    let mut runtime = runtime_with_sources();

    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    runtime
        .load()
        .expect("Should load")
        .add_before_hook({
            let counter = calls.clone();
            move || counter.set(counter.get() + 1)
        })
        .add_after_hook(move |_| counter.set(counter.get() + 1));

    runtime.reset();
    runtime.define::<User>(|_, user| {
        user.name = "Scott".to_string();
        Ok(())
    });

    let user = runtime.build::<User>().to_one().expect("Should build");
    assert_eq!(user.name, "Scott");
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_redefinition_replaces_the_template() {
    let mut runtime = runtime_with_sources();
    runtime.load().expect("Should load");

    runtime.define::<User>(|_, user| {
        user.name = "Replaced".to_string();
        Ok(())
    });

    let user = runtime.build::<User>().to_one().expect("Should build");
    assert_eq!(user.name, "Replaced");
    assert_eq!(runtime.templates().len(), 3);
}

#[test]
fn test_registry_snapshot_is_deterministic() {
    let mut runtime = runtime_with_sources();
    runtime.load().expect("Should load");

    let identifiers: Vec<(&str, &str)> = runtime
        .templates()
        .all()
        .iter()
        .map(|template| (template.type_name(), template.identifier()))
        .collect();

    let teams: Vec<_> = identifiers
        .iter()
        .filter(|(type_name, _)| type_name.ends_with("Team"))
        .collect();
    let users: Vec<_> = identifiers
        .iter()
        .filter(|(type_name, _)| type_name.ends_with("User"))
        .collect();

    assert_eq!(teams.len(), 1);
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].1, "");
    assert_eq!(users[1].1, "admin");
}

#[test]
fn test_hooks_can_inspect_the_built_instance() {
    let mut runtime = runtime_with_sources();

    let seen = Rc::new(Cell::new(false));
    let sink = seen.clone();
    runtime.load().expect("Should load").add_after_hook(move |instance| {
        if let Some(user) = instance.downcast_ref::<User>() {
            assert_eq!(user.name, "Malcom");
            sink.set(true);
        }
    });

    runtime.build::<User>().to_one().expect("Should build");
    assert!(seen.get());
}
