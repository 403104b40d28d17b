//! End-to-end analysis coverage: argument construction, fact injection,
//! member descriptor maps, sub-attributes, and the error taxonomy.

use sigil_engine::{
    Analyzer, Attribute, CustomName, Error, Excludable, FromClassInfo, FromMethodInfo,
    FromParameterInfo, FromPropertyInfo, HasSubAttributes, ParseMethods, ParseParameters,
    ParseProperties, Registry, SubAttributes, Subject,
};
use sigil_model::{
    ArgError, Args, AttrDecl, ClassDecl, ClassInfo, Members, MethodDecl, MethodInfo, Model,
    ParamDecl, ParameterInfo, PropertyDecl, PropertyInfo,
};

#[derive(Debug, Default)]
struct ClassMeta {
    title: Option<String>,
    class_name: String,
    parent: Option<String>,
    fields: Members<Field>,
    routes: Members<Route>,
}

impl Attribute for ClassMeta {
    const NAME: &'static str = "ClassMeta";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        args.expect_known(&["title"])?;
        Ok(ClassMeta {
            title: args.str_of("title", 0)?.map(str::to_string),
            ..ClassMeta::default()
        })
    }
}

impl FromClassInfo for ClassMeta {
    fn from_class(&mut self, class: &ClassInfo<'_>) {
        self.class_name = class.name.to_string();
        self.parent = class.parent.map(str::to_string);
    }
}

impl ParseProperties for ClassMeta {
    type PropertyAttribute = Field;

    fn set_properties(&mut self, properties: Members<Field>) {
        self.fields = properties;
    }
}

impl ParseMethods for ClassMeta {
    type MethodAttribute = Route;

    fn set_methods(&mut self, methods: Members<Route>) {
        self.routes = methods;
    }
}

#[derive(Debug, Default)]
struct Field {
    rename: Option<String>,
    skip: bool,
    column: Option<String>,
    declared_type: Option<String>,
    label: Option<String>,
    tags: Vec<String>,
}

impl Attribute for Field {
    const NAME: &'static str = "Field";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        args.expect_known(&["name", "skip"])?;
        Ok(Field {
            rename: args.str_of("name", 0)?.map(str::to_string),
            skip: args.bool_of("skip", 1)?.unwrap_or(false),
            ..Field::default()
        })
    }
}

impl FromPropertyInfo for Field {
    fn from_property(&mut self, property: &PropertyInfo<'_>) {
        self.column = Some(property.name.to_string());
        self.declared_type = property.type_name.map(str::to_string);
    }
}

impl CustomName for Field {
    fn custom_name(&self) -> Option<&str> {
        self.rename.as_deref()
    }
}

impl Excludable for Field {
    fn exclude(&self) -> bool {
        self.skip
    }
}

impl HasSubAttributes for Field {
    fn sub_attributes() -> SubAttributes<Self> {
        SubAttributes::new()
            .one::<Label>(|field: &mut Field, label| field.label = label.map(|l| l.text))
            .many::<Tag>(|field, tags| {
                field.tags = tags.into_iter().map(|tag| tag.name).collect();
            })
    }
}

#[derive(Debug)]
struct Label {
    text: String,
}

impl Attribute for Label {
    const NAME: &'static str = "Label";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Label {
            text: args.require_str("text", 0)?.to_string(),
        })
    }
}

#[derive(Debug)]
struct Tag {
    name: String,
}

impl Attribute for Tag {
    const NAME: &'static str = "Tag";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Tag {
            name: args.require_str("name", 0)?.to_string(),
        })
    }
}

#[derive(Debug, Default)]
struct Route {
    path: Option<String>,
    method_name: String,
    params: Members<Param>,
}

impl Attribute for Route {
    const NAME: &'static str = "Route";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Route {
            path: args.str_of("path", 0)?.map(str::to_string),
            ..Route::default()
        })
    }
}

impl FromMethodInfo for Route {
    fn from_method(&mut self, method: &MethodInfo<'_>) {
        self.method_name = method.name.to_string();
    }
}

impl ParseParameters for Route {
    type ParameterAttribute = Param;

    fn set_parameters(&mut self, parameters: Members<Param>) {
        self.params = parameters;
    }
}

#[derive(Debug, Default)]
struct Param {
    position: usize,
    has_default: bool,
    bind: Option<String>,
}

impl Attribute for Param {
    const NAME: &'static str = "Param";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Param {
            bind: args.str_of("bind", 0)?.map(str::to_string),
            ..Param::default()
        })
    }
}

impl FromParameterInfo for Param {
    fn from_parameter(&mut self, parameter: &ParameterInfo<'_>) {
        self.position = parameter.position;
        self.has_default = parameter.has_default();
    }
}

#[derive(Debug, Default)]
struct Sparse {
    fields: Members<Marker>,
}

impl Attribute for Sparse {
    const NAME: &'static str = "Sparse";

    fn from_args(_args: &Args) -> Result<Self, ArgError> {
        Ok(Sparse::default())
    }
}

impl ParseProperties for Sparse {
    type PropertyAttribute = Marker;

    fn include_by_default(&self) -> bool {
        false
    }

    fn set_properties(&mut self, properties: Members<Marker>) {
        self.fields = properties;
    }
}

#[derive(Debug)]
struct Marker;

impl Attribute for Marker {
    const NAME: &'static str = "Marker";

    fn from_args(_args: &Args) -> Result<Self, ArgError> {
        Ok(Marker)
    }
}

#[derive(Debug, Default)]
struct Looper {
    seen: bool,
}

impl Attribute for Looper {
    const NAME: &'static str = "Looper";

    fn from_args(_args: &Args) -> Result<Self, ArgError> {
        Ok(Looper::default())
    }
}

impl HasSubAttributes for Looper {
    fn sub_attributes() -> SubAttributes<Self> {
        SubAttributes::new().one::<Boomer>(|looper: &mut Looper, child| {
            looper.seen = child.is_some();
        })
    }
}

#[derive(Debug, Default)]
struct Boomer {
    seen: bool,
}

impl Attribute for Boomer {
    const NAME: &'static str = "Boomer";

    fn from_args(_args: &Args) -> Result<Self, ArgError> {
        Ok(Boomer::default())
    }
}

impl HasSubAttributes for Boomer {
    fn sub_attributes() -> SubAttributes<Self> {
        SubAttributes::new().one::<Looper>(|boomer: &mut Boomer, child| {
            boomer.seen = child.is_some();
        })
    }
}

#[derive(Debug, Default)]
struct Rating {
    stars: i64,
    owner: Option<String>,
    subject: Option<String>,
    badge: Option<String>,
}

impl Attribute for Rating {
    const NAME: &'static str = "Rating";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Rating {
            stars: args.int_of("stars", 0)?.unwrap_or(0),
            ..Rating::default()
        })
    }
}

impl FromClassInfo for Rating {
    fn from_class(&mut self, class: &ClassInfo<'_>) {
        self.owner = Some(class.name.to_string());
    }
}

impl FromPropertyInfo for Rating {
    fn from_property(&mut self, property: &PropertyInfo<'_>) {
        self.subject = Some(property.name.to_string());
    }
}

impl HasSubAttributes for Rating {
    fn sub_attributes() -> SubAttributes<Self> {
        SubAttributes::new().one::<Badge>(|rating: &mut Rating, badge| {
            rating.badge = badge.map(|b| b.text);
        })
    }
}

#[derive(Debug)]
struct Badge {
    text: String,
}

impl Attribute for Badge {
    const NAME: &'static str = "Badge";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Badge {
            text: args.require_str("text", 0)?.to_string(),
        })
    }
}

#[derive(Debug, Default)]
struct Shelf {
    ratings: Members<Rating>,
}

impl Attribute for Shelf {
    const NAME: &'static str = "Shelf";

    fn from_args(_args: &Args) -> Result<Self, ArgError> {
        Ok(Shelf::default())
    }
}

impl ParseProperties for Shelf {
    type PropertyAttribute = Rating;

    fn set_properties(&mut self, properties: Members<Rating>) {
        self.ratings = properties;
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register::<ClassMeta>()
        .with_class_info()
        .with_properties()
        .with_methods();
    registry
        .register::<Field>()
        .with_property_info()
        .with_custom_name()
        .excludable()
        .with_sub_attributes();
    registry.register::<Label>();
    registry.register::<Tag>();
    registry
        .register::<Route>()
        .with_method_info()
        .with_parameters();
    registry.register::<Param>().with_parameter_info();
    registry.register::<Sparse>().with_properties();
    registry.register::<Marker>();
    registry.register::<Looper>().with_sub_attributes();
    registry.register::<Boomer>().with_sub_attributes();
    registry
        .register::<Rating>()
        .transitive()
        .with_class_info()
        .with_property_info()
        .with_sub_attributes();
    registry.register::<Badge>();
    registry.register::<Shelf>().with_properties();
    registry.validate().unwrap();
    registry
}

fn model() -> Model {
    Model::builder()
        .class(
            ClassDecl::new("Task")
                .attr(AttrDecl::with_args(
                    "ClassMeta",
                    Args::new().with_named("title", "Tasks"),
                ))
                .property(PropertyDecl::new("id").typed("int").attr(AttrDecl::with_args(
                    "Field",
                    Args::new().with_named("name", "task_id"),
                )))
                .property(PropertyDecl::new("why").typed("string").attr(
                    AttrDecl::with_args("Field", Args::new().with_named("skip", true)),
                ))
                .property(PropertyDecl::new("note").typed("string"))
                .property(
                    PropertyDecl::new("state")
                        .typed("string")
                        .attr(AttrDecl::new("Field"))
                        .attr(AttrDecl::with_args("Label", Args::new().with("State")))
                        .attr(AttrDecl::with_args(
                            "Tag",
                            Args::new().with_named("name", "open"),
                        ))
                        .attr(AttrDecl::with_args(
                            "Tag",
                            Args::new().with_named("name", "closed"),
                        ))
                        .attr(AttrDecl::with_args(
                            "Tag",
                            Args::new().with_named("name", "stale"),
                        )),
                )
                .method(
                    MethodDecl::new("assign")
                        .param(ParamDecl::new("user").typed("string").attr(
                            AttrDecl::with_args("Param", Args::new().with_named("bind", "user_id")),
                        ))
                        .param(ParamDecl::new("priority").typed("int").defaulted(1))
                        .attr(AttrDecl::with_args(
                            "Route",
                            Args::new().with_named("path", "/assign"),
                        )),
                )
                .method(MethodDecl::new("close")),
        )
        .class(ClassDecl::new("Plain"))
        .class(
            ClassDecl::new("Twice")
                .attr(AttrDecl::new("ClassMeta"))
                .attr(AttrDecl::new("ClassMeta")),
        )
        .class(ClassDecl::new("Broken").attr(AttrDecl::new("Label")))
        .class(
            ClassDecl::new("Sheet")
                .attr(AttrDecl::new("ClassMeta"))
                .property(
                    PropertyDecl::new("twice")
                        .attr(AttrDecl::new("Field"))
                        .attr(AttrDecl::with_args("Label", Args::new().with("one")))
                        .attr(AttrDecl::with_args("Label", Args::new().with("two"))),
                ),
        )
        .class(
            ClassDecl::new("Thin")
                .attr(AttrDecl::new("Sparse"))
                .property(PropertyDecl::new("kept").attr(AttrDecl::new("Marker")))
                .property(PropertyDecl::new("dropped")),
        )
        .class(
            ClassDecl::new("Hollow")
                .attr(AttrDecl::new("Sparse"))
                .property(PropertyDecl::new("a"))
                .property(PropertyDecl::new("b")),
        )
        .class(
            ClassDecl::new("Knot")
                .attr(AttrDecl::new("Looper"))
                .attr(AttrDecl::new("Boomer")),
        )
        .class(
            ClassDecl::new("Book")
                .attr(AttrDecl::with_args(
                    "Rating",
                    Args::new().with_named("stars", 5),
                ))
                .attr(AttrDecl::with_args("Badge", Args::new().with("classic"))),
        )
        .class(
            ClassDecl::new("Novel")
                .extends("Book")
                .attr(AttrDecl::with_args("Badge", Args::new().with("fresh"))),
        )
        .class(
            ClassDecl::new("Library")
                .attr(AttrDecl::new("Shelf"))
                .property(PropertyDecl::new("favorite").typed("Book"))
                .property(PropertyDecl::new("latest").typed("Novel"))
                .property(PropertyDecl::new("name").typed("string")),
        )
        .build()
}

#[test]
fn test_class_arguments_and_facts() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let meta: ClassMeta = analyzer.analyze("Task").unwrap();
    assert_eq!(meta.title.as_deref(), Some("Tasks"));
    assert_eq!(meta.class_name, "Task");
    assert!(meta.parent.is_none());
}

#[test]
fn test_property_descriptor_map() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let meta: ClassMeta = analyzer.analyze("Task").unwrap();
    let names: Vec<&str> = meta.fields.names().collect();
    assert_eq!(names, ["task_id", "note", "state"]);

    // renamed key still reports the declared property through facts
    let id = meta.fields.get("task_id").unwrap();
    assert_eq!(id.column.as_deref(), Some("id"));
    assert_eq!(id.declared_type.as_deref(), Some("int"));

    // unannotated property got a default-built descriptor with facts
    let note = meta.fields.get("note").unwrap();
    assert!(note.rename.is_none());
    assert_eq!(note.column.as_deref(), Some("note"));

    assert!(!meta.fields.contains("why"));
    assert!(!meta.fields.contains("id"));
}

#[test]
fn test_sub_attributes_fold_into_parent() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let meta: ClassMeta = analyzer.analyze("Task").unwrap();
    let state = meta.fields.get("state").unwrap();
    assert_eq!(state.label.as_deref(), Some("State"));
    assert_eq!(state.tags, ["open", "closed", "stale"]);

    // sub-attribute groups on other properties are simply empty
    let note = meta.fields.get("note").unwrap();
    assert!(note.label.is_none());
    assert!(note.tags.is_empty());
}

#[test]
fn test_method_and_parameter_descriptors() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let meta: ClassMeta = analyzer.analyze("Task").unwrap();
    let names: Vec<&str> = meta.routes.names().collect();
    assert_eq!(names, ["assign", "close"]);

    let assign = meta.routes.get("assign").unwrap();
    assert_eq!(assign.path.as_deref(), Some("/assign"));
    assert_eq!(assign.method_name, "assign");

    let params: Vec<&str> = assign.params.names().collect();
    assert_eq!(params, ["user", "priority"]);
    let user = assign.params.get("user").unwrap();
    assert_eq!(user.bind.as_deref(), Some("user_id"));
    assert_eq!(user.position, 0);
    assert!(!user.has_default);
    let priority = assign.params.get("priority").unwrap();
    assert_eq!(priority.position, 1);
    assert!(priority.has_default);

    let close = meta.routes.get("close").unwrap();
    assert!(close.path.is_none());
    assert_eq!(close.method_name, "close");
    assert!(close.params.is_empty());
}

#[test]
fn test_class_not_found() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let err = analyzer.analyze::<ClassMeta>("Ghost").unwrap_err();
    assert!(matches!(err, Error::ClassNotFound { class } if class == "Ghost"));
}

#[test]
fn test_attribute_not_found() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let err = analyzer.analyze::<ClassMeta>("Plain").unwrap_err();
    assert!(
        matches!(err, Error::NotFound { class, attribute } if class == "Plain" && attribute == "ClassMeta")
    );
}

#[test]
fn test_unregistered_attribute_type() {
    let registry = Registry::new();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let err = analyzer.analyze::<ClassMeta>("Task").unwrap_err();
    assert!(matches!(err, Error::UnknownAttribute { attribute } if attribute == "ClassMeta"));
}

#[test]
fn test_ambiguous_class_attribute() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let err = analyzer.analyze::<ClassMeta>("Twice").unwrap_err();
    assert!(
        matches!(err, Error::Ambiguous { target, count, .. } if target == "Twice" && count == 2)
    );
}

#[test]
fn test_construction_error_carries_argument_error() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let err = analyzer.analyze::<Label>("Broken").unwrap_err();
    assert!(matches!(
        err,
        Error::Construction {
            source: ArgError::Missing { .. },
            ..
        }
    ));
}

#[test]
fn test_ambiguous_sub_attribute() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let err = analyzer.analyze::<ClassMeta>("Sheet").unwrap_err();
    assert!(
        matches!(err, Error::Ambiguous { target, attribute, count } if target == "Sheet::twice" && attribute == "Label" && count == 2)
    );
}

#[test]
fn test_opt_in_membership() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let sparse: Sparse = analyzer.analyze("Thin").unwrap();
    let names: Vec<&str> = sparse.fields.names().collect();
    assert_eq!(names, ["kept"]);

    // opt-in with no annotated members at all leaves the map empty
    let hollow: Sparse = analyzer.analyze("Hollow").unwrap();
    assert!(hollow.fields.is_empty());
}

#[test]
fn test_sub_attribute_cycle_reports_chain() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let err = analyzer.analyze::<Looper>("Knot").unwrap_err();
    assert!(matches!(err, Error::Cycle { chain } if chain == "Looper -> Boomer -> Looper"));
}

#[test]
fn test_transitive_property_fallback() {
    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let shelf: Shelf = analyzer.analyze("Library").unwrap();

    // attribute found on the property's own type, sub-attributes from there too
    let favorite = shelf.ratings.get("favorite").unwrap();
    assert_eq!(favorite.stars, 5);
    assert_eq!(favorite.owner.as_deref(), Some("Book"));
    assert_eq!(favorite.subject.as_deref(), Some("favorite"));
    assert_eq!(favorite.badge.as_deref(), Some("classic"));

    // attribute found on an ancestor of the property's type; its class facts
    // come from that ancestor, but sub-attributes still come from the type
    // class itself
    let latest = shelf.ratings.get("latest").unwrap();
    assert_eq!(latest.stars, 5);
    assert_eq!(latest.owner.as_deref(), Some("Book"));
    assert_eq!(latest.subject.as_deref(), Some("latest"));
    assert_eq!(latest.badge.as_deref(), Some("fresh"));

    // unmodeled property type falls back to a default-built descriptor
    let name = shelf.ratings.get("name").unwrap();
    assert_eq!(name.stars, 0);
    assert!(name.owner.is_none());
    assert_eq!(name.subject.as_deref(), Some("name"));
    assert!(name.badge.is_none());
}

#[test]
fn test_subject_analysis() {
    struct Ticket;

    impl Subject for Ticket {
        fn class_name(&self) -> &str {
            "Task"
        }
    }

    let registry = registry();
    let model = model();
    let analyzer = Analyzer::new(&registry, &model);

    let meta: ClassMeta = analyzer.analyze_subject(&Ticket).unwrap();
    assert_eq!(meta.class_name, "Task");
    assert_eq!(meta.title.as_deref(), Some("Tasks"));
}
