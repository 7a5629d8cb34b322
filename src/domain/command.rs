// Scan command model: the instructions a scan is composed of and their wire XML
use crate::error::{MalformedResponse, Result, ScanError};
use crate::infrastructure::xml::{format_float, parse_bool, parse_number, Element, XmlBuilder};
use std::fmt;
use std::str::FromStr;

/// Value written to a device by `set` or awaited by `wait`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanValue {
    Number(f64),
    Text(String),
}

impl ScanValue {
    /// Quoted text is always `Text`; unquoted text becomes `Number` when it parses as one.
    pub fn from_wire(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(quoted) = trimmed
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return ScanValue::Text(quoted.to_string());
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => ScanValue::Number(number),
            _ => ScanValue::Text(text.to_string()),
        }
    }

    fn describe(&self) -> String {
        match self {
            ScanValue::Number(number) => format_float(*number),
            ScanValue::Text(text) => format!("'{text}'"),
        }
    }
}

/// Wire form: numbers bare, text in double quotes.
impl fmt::Display for ScanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanValue::Number(number) => f.write_str(&format_float(*number)),
            ScanValue::Text(text) => write!(f, "\"{text}\""),
        }
    }
}

impl From<f64> for ScanValue {
    fn from(value: f64) -> Self {
        ScanValue::Number(value)
    }
}

impl From<i32> for ScanValue {
    fn from(value: i32) -> Self {
        ScanValue::Number(f64::from(value))
    }
}

impl From<&str> for ScanValue {
    fn from(value: &str) -> Self {
        ScanValue::Text(value.to_string())
    }
}

impl From<String> for ScanValue {
    fn from(value: String) -> Self {
        ScanValue::Text(value)
    }
}

/// How a `wait` compares the device readback with the desired value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    #[default]
    Equals,
    AtLeast,
    Above,
    AtMost,
    Below,
    IncreaseBy,
    DecreaseBy,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equals => "EQUALS",
            Comparison::AtLeast => "AT_LEAST",
            Comparison::Above => "ABOVE",
            Comparison::AtMost => "AT_MOST",
            Comparison::Below => "BELOW",
            Comparison::IncreaseBy => "INCREASE_BY",
            Comparison::DecreaseBy => "DECREASE_BY",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        let comparison = match s.trim().to_ascii_uppercase().as_str() {
            "=" | "==" | "EQUALS" => Comparison::Equals,
            ">=" | "AT_LEAST" => Comparison::AtLeast,
            ">" | "ABOVE" => Comparison::Above,
            "<=" | "AT_MOST" => Comparison::AtMost,
            "<" | "BELOW" => Comparison::Below,
            "+=" | "TO INCREASE BY" | "INCREASE_BY" => Comparison::IncreaseBy,
            "-=" | "TO DECREASE BY" | "DECREASE_BY" => Comparison::DecreaseBy,
            _ => return Err(ScanError::invalid(format!("unknown comparison '{s}'"))),
        };
        Ok(comparison)
    }
}

fn require_name(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScanError::invalid(format!("{what} must not be empty")));
    }
    Ok(())
}

fn require_finite(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ScanError::invalid(format!("{what} must be a finite number, got {value}")));
    }
    Ok(())
}

fn require_non_negative(what: &str, value: f64) -> Result<()> {
    require_finite(what, value)?;
    if value < 0.0 {
        return Err(ScanError::invalid(format!("{what} must not be negative, got {value}")));
    }
    Ok(())
}

fn require_value(what: &str, value: &ScanValue) -> Result<()> {
    match value {
        ScanValue::Number(number) => require_finite(what, *number),
        ScanValue::Text(_) => Ok(()),
    }
}

/// Free-text annotation, echoed in the scan log.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    text: String,
    address: Option<u64>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: u64) -> Self {
        self.address = Some(address);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn address(&self) -> Option<u64> {
        self.address
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("comment");
        if let Some(address) = self.address {
            xml.value("address", address);
        }
        xml.text("text", &self.text).close("comment");
    }

    fn describe(&self) -> String {
        format!("CommentCommand('{}')", self.text)
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let address = element
            .optional_text("address")
            .map(|text| parse_number("address", text))
            .transpose()?;
        Ok(Self {
            text: element.optional_text("text").unwrap_or_default().to_string(),
            address,
        })
    }
}

/// Pause the scan for a number of seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    seconds: f64,
}

impl Delay {
    pub fn new(seconds: f64) -> Result<Self> {
        require_non_negative("delay seconds", seconds)?;
        Ok(Self { seconds })
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("delay").float("seconds", self.seconds).close("delay");
    }

    fn describe(&self) -> String {
        format!("DelayCommand(seconds={})", format_float(self.seconds))
    }
}

/// Write a value to a device.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    device: String,
    value: ScanValue,
    completion: bool,
    wait: bool,
    tolerance: f64,
    timeout: f64,
}

impl Set {
    pub fn new(device: impl Into<String>, value: impl Into<ScanValue>) -> Result<Self> {
        Self::builder(device, value).build()
    }

    pub fn builder(device: impl Into<String>, value: impl Into<ScanValue>) -> SetBuilder {
        SetBuilder {
            inner: Set {
                device: device.into(),
                value: value.into(),
                completion: false,
                wait: true,
                tolerance: 0.1,
                timeout: 0.0,
            },
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn value(&self) -> &ScanValue {
        &self.value
    }

    pub fn completion(&self) -> bool {
        self.completion
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn timeout(&self) -> f64 {
        self.timeout
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("set")
            .text("device", &self.device)
            .value("value", &self.value)
            .value("completion", self.completion)
            .value("wait", self.wait)
            .float("tolerance", self.tolerance)
            .float("timeout", self.timeout)
            .close("set");
    }

    fn describe(&self) -> String {
        format!(
            "SetCommand(device={}, value={}, completion={}, wait={}, tolerance={}, timeout={})",
            self.device,
            self.value.describe(),
            self.completion,
            self.wait,
            format_float(self.tolerance),
            format_float(self.timeout)
        )
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let mut builder = Set::builder(
            element.required_text("set", "device")?,
            ScanValue::from_wire(element.required_text("set", "value")?),
        );
        if let Some(text) = element.optional_text("completion") {
            builder = builder.completion(parse_bool("completion", text)?);
        }
        if let Some(text) = element.optional_text("wait") {
            builder = builder.wait(parse_bool("wait", text)?);
        }
        if let Some(text) = element.optional_text("tolerance") {
            builder = builder.tolerance(parse_number("tolerance", text)?);
        }
        if let Some(text) = element.optional_text("timeout") {
            builder = builder.timeout(parse_number("timeout", text)?);
        }
        builder.build().map_err(|e| invalid_command("set", e))
    }
}

#[derive(Debug, Clone)]
pub struct SetBuilder {
    inner: Set,
}

impl SetBuilder {
    /// Await completion of the write (callback) before continuing.
    pub fn completion(mut self, completion: bool) -> Self {
        self.inner.completion = completion;
        self
    }

    /// Wait for the readback to reach the value before continuing.
    pub fn wait(mut self, wait: bool) -> Self {
        self.inner.wait = wait;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.inner.tolerance = tolerance;
        self
    }

    /// Seconds, 0 waits forever.
    pub fn timeout(mut self, timeout: f64) -> Self {
        self.inner.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Set> {
        let set = self.inner;
        require_name("set device", &set.device)?;
        require_value("set value", &set.value)?;
        require_non_negative("set tolerance", set.tolerance)?;
        require_non_negative("set timeout", set.timeout)?;
        Ok(set)
    }
}

/// Block until a device readback satisfies a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Wait {
    device: String,
    desired_value: ScanValue,
    comparison: Comparison,
    tolerance: f64,
    timeout: f64,
}

impl Wait {
    pub fn new(device: impl Into<String>, desired_value: impl Into<ScanValue>) -> Result<Self> {
        Self::builder(device, desired_value).build()
    }

    pub fn builder(device: impl Into<String>, desired_value: impl Into<ScanValue>) -> WaitBuilder {
        WaitBuilder {
            inner: Wait {
                device: device.into(),
                desired_value: desired_value.into(),
                comparison: Comparison::Equals,
                tolerance: 0.1,
                timeout: 0.0,
            },
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn desired_value(&self) -> &ScanValue {
        &self.desired_value
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn timeout(&self) -> f64 {
        self.timeout
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("wait")
            .text("device", &self.device)
            .value("value", &self.desired_value)
            .text("comparison", self.comparison.as_str())
            .float("tolerance", self.tolerance)
            .float("timeout", self.timeout)
            .close("wait");
    }

    fn describe(&self) -> String {
        format!(
            "WaitCommand(device={}, comparison={}, value={}, tolerance={}, timeout={})",
            self.device,
            self.comparison,
            self.desired_value.describe(),
            format_float(self.tolerance),
            format_float(self.timeout)
        )
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let mut builder = Wait::builder(
            element.required_text("wait", "device")?,
            ScanValue::from_wire(element.required_text("wait", "value")?),
        );
        if let Some(text) = element.optional_text("comparison") {
            let comparison = text
                .parse::<Comparison>()
                .map_err(|e| invalid_command("wait", e))?;
            builder = builder.comparison(comparison);
        }
        if let Some(text) = element.optional_text("tolerance") {
            builder = builder.tolerance(parse_number("tolerance", text)?);
        }
        if let Some(text) = element.optional_text("timeout") {
            builder = builder.timeout(parse_number("timeout", text)?);
        }
        builder.build().map_err(|e| invalid_command("wait", e))
    }
}

#[derive(Debug, Clone)]
pub struct WaitBuilder {
    inner: Wait,
}

impl WaitBuilder {
    pub fn comparison(mut self, comparison: Comparison) -> Self {
        self.inner.comparison = comparison;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.inner.tolerance = tolerance;
        self
    }

    /// Seconds, 0 waits forever.
    pub fn timeout(mut self, timeout: f64) -> Self {
        self.inner.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Wait> {
        let wait = self.inner;
        require_name("wait device", &wait.device)?;
        require_value("wait value", &wait.desired_value)?;
        require_non_negative("wait tolerance", wait.tolerance)?;
        require_non_negative("wait timeout", wait.timeout)?;
        Ok(wait)
    }
}

/// Step a device from `start` to `end`, running the body at every step.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    device: String,
    start: f64,
    end: f64,
    step: f64,
    completion: bool,
    wait: bool,
    body: Vec<Command>,
}

impl Loop {
    pub fn builder(device: impl Into<String>, start: f64, end: f64, step: f64) -> LoopBuilder {
        LoopBuilder {
            inner: Loop {
                device: device.into(),
                start,
                end,
                step,
                completion: false,
                wait: true,
                body: Vec::new(),
            },
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn completion(&self) -> bool {
        self.completion
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    pub fn body(&self) -> &[Command] {
        &self.body
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("loop")
            .text("device", &self.device)
            .float("start", self.start)
            .float("end", self.end)
            .float("step", self.step)
            .value("completion", self.completion)
            .value("wait", self.wait);
        if self.body.is_empty() {
            xml.empty("body");
        } else {
            xml.open("body");
            for command in &self.body {
                command.write_xml(xml);
            }
            xml.close("body");
        }
        xml.close("loop");
    }

    fn describe(&self) -> String {
        let body: Vec<String> = self.body.iter().map(Command::describe).collect();
        format!(
            "LoopCommand(device={}, start={}, end={}, step={}, completion={}, wait={}, body=[{}])",
            self.device,
            format_float(self.start),
            format_float(self.end),
            format_float(self.step),
            self.completion,
            self.wait,
            body.join(", ")
        )
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let mut builder = Loop::builder(
            element.required_text("loop", "device")?,
            element.required_number("loop", "start")?,
            element.required_number("loop", "end")?,
            element.required_number("loop", "step")?,
        );
        if let Some(text) = element.optional_text("completion") {
            builder = builder.completion(parse_bool("completion", text)?);
        }
        if let Some(text) = element.optional_text("wait") {
            builder = builder.wait(parse_bool("wait", text)?);
        }
        if let Some(body) = element.child("body") {
            for child in &body.children {
                builder = builder.command(Command::from_element(child)?);
            }
        }
        builder.build().map_err(|e| invalid_command("loop", e))
    }
}

#[derive(Debug, Clone)]
pub struct LoopBuilder {
    inner: Loop,
}

impl LoopBuilder {
    pub fn completion(mut self, completion: bool) -> Self {
        self.inner.completion = completion;
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.inner.wait = wait;
        self
    }

    /// Append one command to the body.
    pub fn command(mut self, command: impl Into<Command>) -> Self {
        self.inner.body.push(command.into());
        self
    }

    pub fn body<I>(mut self, commands: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        self.inner.body.extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<Loop> {
        let lp = self.inner;
        require_name("loop device", &lp.device)?;
        require_finite("loop start", lp.start)?;
        require_finite("loop end", lp.end)?;
        require_finite("loop step", lp.step)?;
        if lp.step == 0.0 {
            return Err(ScanError::invalid("loop step must not be zero"));
        }
        Ok(lp)
    }
}

/// Run a server-side script with string arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    path: String,
    arguments: Vec<String>,
}

impl Script {
    pub fn new<I>(path: impl Into<String>, arguments: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let path = path.into();
        require_name("script path", &path)?;
        Ok(Self {
            path,
            arguments: arguments.into_iter().map(|a| a.to_string()).collect(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("script").text("path", &self.path);
        if !self.arguments.is_empty() {
            xml.open("arguments");
            for argument in &self.arguments {
                xml.text("argument", argument);
            }
            xml.close("arguments");
        }
        xml.close("script");
    }

    fn describe(&self) -> String {
        let mut parts = vec![format!("'{}'", self.path)];
        parts.extend(self.arguments.iter().map(|a| format!("'{a}'")));
        format!("ScriptCommand({})", parts.join(", "))
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let arguments: Vec<String> = element
            .child("arguments")
            .map(|args| args.children_named("argument").map(|a| a.text.clone()).collect())
            .unwrap_or_default();
        Script::new(element.required_text("script", "path")?, arguments)
            .map_err(|e| invalid_command("script", e))
    }
}

/// Splice another scan file into this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    scan_file: String,
    macros: String,
}

impl Include {
    pub fn new(scan_file: impl Into<String>) -> Result<Self> {
        let scan_file = scan_file.into();
        require_name("include scan file", &scan_file)?;
        Ok(Self {
            scan_file,
            macros: String::new(),
        })
    }

    /// Macro definitions in `name=value[,name=value]` form.
    pub fn with_macros(mut self, macros: impl Into<String>) -> Self {
        self.macros = macros.into();
        self
    }

    pub fn with_macro(mut self, name: &str, value: &str) -> Self {
        if !self.macros.is_empty() {
            self.macros.push(',');
        }
        self.macros.push_str(name);
        self.macros.push('=');
        self.macros.push_str(value);
        self
    }

    pub fn scan_file(&self) -> &str {
        &self.scan_file
    }

    pub fn macros(&self) -> &str {
        &self.macros
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("include").text("scan_file", &self.scan_file);
        if !self.macros.is_empty() {
            xml.text("macros", &self.macros);
        }
        xml.close("include");
    }

    fn describe(&self) -> String {
        format!("IncludeCommand(scan_file='{}', macros='{}')", self.scan_file, self.macros)
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let include = Include::new(element.required_text("include", "scan_file")?)
            .map_err(|e| invalid_command("include", e))?;
        Ok(include.with_macros(element.optional_text("macros").unwrap_or_default()))
    }
}

/// Record the current value of a set of devices.
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    devices: Vec<String>,
}

impl Log {
    pub fn new<I, S>(devices: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let devices: Vec<String> = devices.into_iter().map(Into::into).collect();
        if devices.is_empty() {
            return Err(ScanError::invalid("log needs at least one device"));
        }
        for device in &devices {
            require_name("log device", device)?;
        }
        Ok(Self { devices })
    }

    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("log").open("devices");
        for device in &self.devices {
            xml.text("device", device);
        }
        xml.close("devices").close("log");
    }

    fn describe(&self) -> String {
        format!("LogCommand({})", self.devices.join(", "))
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let container = element.child("devices").unwrap_or(element);
        let devices = container.children_named("device").map(|d| d.text.clone());
        Log::new(devices).map_err(|e| invalid_command("log", e))
    }
}

/// The unlabeled `<command>` marker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Generic {
    automatic: bool,
}

impl Generic {
    pub fn new(automatic: bool) -> Self {
        Self { automatic }
    }

    pub fn automatic(&self) -> bool {
        self.automatic
    }

    fn write_xml(&self, xml: &mut XmlBuilder) {
        xml.open("command").value("automatic", self.automatic).close("command");
    }

    fn describe(&self) -> String {
        format!("Command(automatic={})", self.automatic)
    }

    fn from_element(element: &Element) -> std::result::Result<Self, MalformedResponse> {
        let automatic = element
            .optional_text("automatic")
            .map(|text| parse_bool("automatic", text))
            .transpose()?
            .unwrap_or(false);
        Ok(Self { automatic })
    }
}

fn invalid_command(tag: &'static str, error: ScanError) -> MalformedResponse {
    MalformedResponse::InvalidCommand {
        tag,
        reason: error.to_string(),
    }
}

/// One instruction of a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Comment(Comment),
    Delay(Delay),
    Set(Set),
    Wait(Wait),
    Loop(Loop),
    Script(Script),
    Include(Include),
    Log(Log),
    Generic(Generic),
}

impl Command {
    /// Element name used on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            Command::Comment(_) => "comment",
            Command::Delay(_) => "delay",
            Command::Set(_) => "set",
            Command::Wait(_) => "wait",
            Command::Loop(_) => "loop",
            Command::Script(_) => "script",
            Command::Include(_) => "include",
            Command::Log(_) => "log",
            Command::Generic(_) => "command",
        }
    }

    /// XML fragment for this command (nested commands included).
    pub fn render(&self) -> String {
        let mut xml = XmlBuilder::new();
        self.write_xml(&mut xml);
        xml.finish()
    }

    pub(crate) fn write_xml(&self, xml: &mut XmlBuilder) {
        match self {
            Command::Comment(c) => c.write_xml(xml),
            Command::Delay(c) => c.write_xml(xml),
            Command::Set(c) => c.write_xml(xml),
            Command::Wait(c) => c.write_xml(xml),
            Command::Loop(c) => c.write_xml(xml),
            Command::Script(c) => c.write_xml(xml),
            Command::Include(c) => c.write_xml(xml),
            Command::Log(c) => c.write_xml(xml),
            Command::Generic(c) => c.write_xml(xml),
        }
    }

    /// Short human-readable form, e.g. `DelayCommand(seconds=2.0)`.
    pub fn describe(&self) -> String {
        match self {
            Command::Comment(c) => c.describe(),
            Command::Delay(c) => c.describe(),
            Command::Set(c) => c.describe(),
            Command::Wait(c) => c.describe(),
            Command::Loop(c) => c.describe(),
            Command::Script(c) => c.describe(),
            Command::Include(c) => c.describe(),
            Command::Log(c) => c.describe(),
            Command::Generic(c) => c.describe(),
        }
    }

    /// Rebuild a command from its wire element. Unrecognized child elements are ignored.
    pub fn from_element(element: &Element) -> std::result::Result<Command, MalformedResponse> {
        let command = match element.name.as_str() {
            "comment" => Command::Comment(Comment::from_element(element)?),
            "delay" => {
                let seconds = element.required_number("delay", "seconds")?;
                Command::Delay(Delay::new(seconds).map_err(|e| invalid_command("delay", e))?)
            }
            "set" => Command::Set(Set::from_element(element)?),
            "wait" => Command::Wait(Wait::from_element(element)?),
            "loop" => Command::Loop(Loop::from_element(element)?),
            "script" => Command::Script(Script::from_element(element)?),
            "include" => Command::Include(Include::from_element(element)?),
            "log" => Command::Log(Log::from_element(element)?),
            "command" => Command::Generic(Generic::from_element(element)?),
            other => return Err(MalformedResponse::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Command {
                fn from(command: $variant) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_from_variant!(Comment, Delay, Set, Wait, Loop, Script, Include, Log, Generic);
