//! The fixed table of motion functions and status subcommands.
//!
//! Every entry lists its accepted argument signatures. A call picks the first
//! signature whose kinds match the arguments exactly, then the first one
//! they convert to numerically, and fails with
//! [`CommandError::BadArgument`] otherwise.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use tmlisten_frame::{Header, TMSCT, TMSTA};
use tmlisten_script::{Arg, Conversion, Scalar, ValueKind};

use crate::error::{CommandError, Result};
use crate::grammar::Command;

const S: ValueKind = ValueKind::STRING;
const B: ValueKind = ValueKind::BOOL;
const I: ValueKind = ValueKind::INT;
const F: ValueKind = ValueKind::FLOAT;
const I3: ValueKind = ValueKind::array(Scalar::Int, 3);
const F6: ValueKind = ValueKind::array(Scalar::Float, 6);
const F9: ValueKind = ValueKind::array(Scalar::Float, 9);

/// One catalog entry.
#[derive(Debug, PartialEq, Eq)]
pub struct FunctionSpec {
    /// Name as written in scripts.
    pub name: &'static str,
    /// Header family the function may be sent under.
    pub affinity: Header,
    /// Token written on the wire: the name itself, or a subcommand code.
    pub wire: &'static str,
    /// Kind returned by the controller, for motion functions.
    pub returns: Option<ValueKind>,
    /// Accepted argument lists, in preference order.
    pub signatures: &'static [&'static [ValueKind]],
}

macro_rules! motion {
    ($($ident:ident = $name:literal -> $ret:ident [$($sig:expr),* $(,)?];)*) => {$(
        pub static $ident: FunctionSpec = FunctionSpec {
            name: $name,
            affinity: TMSCT,
            wire: $name,
            returns: Some($ret),
            signatures: &[$(&$sig),*],
        };
    )*};
}

motion! {
    QUEUE_TAG = "QueueTag" -> B [[I], [I, I]];
    WAIT_QUEUE_TAG = "WaitQueueTag" -> I [[I], [I, I]];
    STOP_AND_CLEAR_BUFFER = "StopAndClearBuffer" -> B [[]];
    PAUSE = "Pause" -> B [[]];
    RESUME = "Resume" -> B [[]];
    PTP = "PTP" -> B [
        [S, F6, I, I, I, B],
        [S, F6, I, I, I, B, I3],
        [S, F, F, F, F, F, F, I, I, I, B],
        [S, F, F, F, F, F, F, I, I, I, B, I, I, I],
    ];
    LINE = "Line" -> B [
        [S, F6, I, I, I, B],
        [S, F, F, F, F, F, F, I, I, I, B],
    ];
    CIRCLE = "Circle" -> B [
        [S, F6, F6, I, I, I, B],
        [S, F, F, F, F, F, F, F, F, F, F, F, F, I, I, I, B],
    ];
    PLINE = "PLine" -> B [
        [S, F6, I, I, I],
        [S, F, F, F, F, F, F, I, I, I],
    ];
    MOVE_PTP = "Move_PTP" -> B [
        [S, F6, I, I, I, B],
        [S, F, F, F, F, F, F, I, I, I, B],
    ];
    MOVE_LINE = "Move_Line" -> B [
        [S, F6, I, I, I, B],
        [S, F, F, F, F, F, F, I, I, I, B],
    ];
    MOVE_PLINE = "Move_PLine" -> B [
        [S, F6, I, I, I],
        [S, F, F, F, F, F, F, I, I, I],
    ];
    CHANGE_BASE = "ChangeBase" -> B [[S], [F6], [F, F, F, F, F, F]];
    CHANGE_TCP = "ChangeTCP" -> B [
        [S],
        [F6],
        [F6, F],
        [F6, F, F9],
        [F, F, F, F, F, F],
        [F, F, F, F, F, F, F],
        [F, F, F, F, F, F, F, F, F, F, F, F, F, F, F, F],
    ];
    CHANGE_LOAD = "ChangeLoad" -> B [[F]];
    PVT_ENTER = "PVTEnter" -> B [[I], []];
    PVT_EXIT = "PVTExit" -> B [[]];
    PVT_POINT = "PVTPoint" -> B [
        [F6, F6, F],
        [F, F, F, F, F, F, F, F, F, F, F, F, F],
    ];
    PVT_PAUSE = "PVTPause" -> B [[]];
    PVT_RESUME = "PVTResume" -> B [[]];
}

/// Enter external script control mode.
pub static IN_EXT_SCRIPT_CTL_MODE: FunctionSpec = FunctionSpec {
    name: "InExtScriptCtlMode",
    affinity: TMSTA,
    wire: "00",
    returns: None,
    signatures: &[&[]],
};

/// Ask whether a queue tag has completed.
pub static QUEUE_TAG_DONE: FunctionSpec = FunctionSpec {
    name: "QueueTagDone",
    affinity: TMSTA,
    wire: "01",
    returns: None,
    signatures: &[&[I]],
};

/// Every catalog entry.
pub static FUNCTIONS: &[&FunctionSpec] = &[
    &QUEUE_TAG,
    &WAIT_QUEUE_TAG,
    &STOP_AND_CLEAR_BUFFER,
    &PAUSE,
    &RESUME,
    &PTP,
    &LINE,
    &CIRCLE,
    &PLINE,
    &MOVE_PTP,
    &MOVE_LINE,
    &MOVE_PLINE,
    &CHANGE_BASE,
    &CHANGE_TCP,
    &CHANGE_LOAD,
    &PVT_ENTER,
    &PVT_EXIT,
    &PVT_POINT,
    &PVT_PAUSE,
    &PVT_RESUME,
    &IN_EXT_SCRIPT_CTL_MODE,
    &QUEUE_TAG_DONE,
];

impl FunctionSpec {
    /// Index of the signature that accepts `args`.
    pub fn resolve(&self, args: &[Arg]) -> Option<usize> {
        let fit = |signature: &[ValueKind]| -> Conversion {
            if signature.len() != args.len() {
                return Conversion::Incompatible;
            }
            signature
                .iter()
                .zip(args)
                .map(|(expected, arg)| expected.accepts(arg.kind()))
                .min()
                .unwrap_or(Conversion::Exact)
        };

        let fits: Vec<Conversion> = self.signatures.iter().map(|&sig| fit(sig)).collect();
        fits.iter()
            .position(|c| *c == Conversion::Exact)
            .or_else(|| fits.iter().position(|c| *c == Conversion::Numeric))
    }

    /// Render a call with `args`.
    ///
    /// Script functions render as `Name(a,b)`, subcommands as `code,a`.
    pub fn call(&self, args: Vec<Arg>) -> Result<Command> {
        if self.resolve(&args).is_none() {
            let given: Vec<String> = args.iter().map(|arg| arg.kind().to_string()).collect();
            return Err(CommandError::BadArgument {
                function: self.name,
                given: given.join(", "),
            });
        }

        let rendered: Vec<&str> = args.iter().map(Arg::text).collect();
        let text = match self.affinity {
            Header::ScriptCommand => format!("{}({})", self.wire, rendered.join(",")),
            _ if rendered.is_empty() => self.wire.to_string(),
            _ => format!("{},{}", self.wire, rendered.join(",")),
        };
        Ok(Command::raw(self.affinity, text))
    }
}

impl fmt::Display for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Name-keyed lookup over [`FUNCTIONS`].
#[derive(Debug)]
pub struct Catalog {
    functions: HashMap<&'static str, &'static FunctionSpec>,
}

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// The process-wide catalog, built on first use.
    pub fn global() -> &'static Catalog {
        GLOBAL.get_or_init(|| Catalog::from_specs(FUNCTIONS))
    }

    pub fn from_specs(specs: &[&'static FunctionSpec]) -> Self {
        let functions = specs.iter().map(|spec| (spec.name, *spec)).collect();
        Self { functions }
    }

    /// Look up a function by its script name (case-sensitive).
    pub fn get(&self, name: &str) -> Option<&'static FunctionSpec> {
        self.functions.get(name).copied()
    }

    pub fn call(&self, name: &str, args: Vec<Arg>) -> Result<Command> {
        self.get(name)
            .ok_or_else(|| CommandError::UnknownFunction(name.to_string()))?
            .call(args)
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &'static FunctionSpec> {
        let mut specs: Vec<&'static FunctionSpec> = self.functions.values().copied().collect();
        specs.sort_by_key(|spec| spec.name);
        specs.into_iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
