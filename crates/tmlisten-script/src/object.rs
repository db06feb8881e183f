//! Parameterized controller objects.
//!
//! Controller objects are addressed as `Item[key].Attribute`, for example
//! `Point["P1"].Value` or `Robot[0].Joint`. Each accessor returns a struct of
//! attribute handles: writable attributes are [`Variable`]s, read-only ones
//! are [`ReadOnly`] and cannot be assignment targets.

use crate::error::{Result, ScriptError};
use crate::value::ScriptValue;
use crate::variable::{ReadOnly, Variable};

macro_rules! attributes {
    (
        $(#[$doc:meta])*
        $owner:ident {
            $($field:ident = $attr:literal: $handle:ident<$ty:ty>,)*
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $owner {
            $(pub $field: $handle<$ty>,)*
        }

        impl $owner {
            fn with_prefix(prefix: &str) -> Self {
                Self {
                    $($field: $handle::<$ty>::attribute(prefix, $attr),)*
                }
            }
        }
    };
}

fn keyed(item: &str, key: &str) -> String {
    format!("{item}[{}].", key.render())
}

attributes! {
    /// `Point["name"]`
    PointAttributes {
        value = "Value": Variable<[f32; 6]>,
        pose = "Pose": Variable<[i32; 3]>,
        flange = "Flange": ReadOnly<[f32; 6]>,
        base_name = "BaseName": ReadOnly<String>,
        tcp_name = "TCPName": ReadOnly<String>,
        teach_value = "TeachValue": ReadOnly<[f32; 6]>,
        teach_pose = "TeachPose": ReadOnly<[i32; 3]>,
    }
}

attributes! {
    /// `Base["name"]`
    BaseAttributes {
        value = "Value": Variable<[f32; 6]>,
        kind = "Type": ReadOnly<String>,
        teach_value = "TeachValue": ReadOnly<[f32; 6]>,
    }
}

attributes! {
    /// `TCP["name"]` for a user-defined tool.
    ToolAttributes {
        value = "Value": Variable<[f32; 6]>,
        mass = "Mass": Variable<f32>,
        moi = "MOI": Variable<[f32; 3]>,
        mcf = "MCF": Variable<[f32; 6]>,
        teach_value = "TeachValue": ReadOnly<[f32; 6]>,
        teach_mass = "TeachMass": ReadOnly<f32>,
        teach_moi = "TeachMOI": ReadOnly<[f32; 3]>,
        teach_mcf = "TeachMCF": ReadOnly<[f32; 6]>,
    }
}

attributes! {
    /// `TCP["NOTOOL"]` and `TCP["HandCamera"]`; every attribute is read-only.
    SystemToolAttributes {
        value = "Value": ReadOnly<[f32; 6]>,
        mass = "Mass": ReadOnly<f32>,
        moi = "MOI": ReadOnly<[f32; 3]>,
        mcf = "MCF": ReadOnly<[f32; 6]>,
        teach_value = "TeachValue": ReadOnly<[f32; 6]>,
        teach_mass = "TeachMass": ReadOnly<f32>,
        teach_moi = "TeachMOI": ReadOnly<[f32; 3]>,
        teach_mcf = "TeachMCF": ReadOnly<[f32; 6]>,
    }
}

attributes! {
    /// `VPoint["name"]`
    VPointAttributes {
        value = "Value": Variable<[f32; 6]>,
        base_name = "BaseName": ReadOnly<String>,
        teach_value = "TeachValue": ReadOnly<[f32; 6]>,
    }
}

attributes! {
    /// `IO["ControlBox"]` and `IO["EndModule"]`
    IoAttributes {
        di = "DI": ReadOnly<[u8; 16]>,
        do_ = "DO": Variable<[u8; 16]>,
        ai = "AI": ReadOnly<[f32; 1]>,
        ao = "AO": Variable<[f32; 2]>,
        instant_do = "InstantDO": Variable<[u8; 16]>,
        instant_ao = "InstantAO": Variable<[f32; 2]>,
    }
}

attributes! {
    /// `IO["Safety"]`
    SafetyIoAttributes {
        si = "SI": ReadOnly<[u8; 5]>,
        so = "SO": ReadOnly<[u8; 5]>,
    }
}

attributes! {
    /// `Robot[0]`
    RobotAttributes {
        coord_robot = "CoordRobot": ReadOnly<[f32; 6]>,
        coord_base = "CoordBase": ReadOnly<[f32; 6]>,
        joint = "Joint": ReadOnly<[f32; 6]>,
        base_name = "BaseName": ReadOnly<String>,
        tcp_name = "TCPName": ReadOnly<String>,
        camera_light = "CameraLight": Variable<i32>,
        tcp_force_3d = "TCPForce3D": ReadOnly<f32>,
        tcp_speed_3d = "TCPSpeed3D": ReadOnly<f32>,
    }
}

attributes! {
    /// `FT["name"]`, force/torque sensor readings.
    FtAttributes {
        x = "X": ReadOnly<f32>,
        y = "Y": ReadOnly<f32>,
        z = "Z": ReadOnly<f32>,
        tx = "TX": ReadOnly<f32>,
        ty = "TY": ReadOnly<f32>,
        tz = "TZ": ReadOnly<f32>,
        f3d = "F3D": ReadOnly<f32>,
        t3d = "T3D": ReadOnly<f32>,
        force_value = "ForceValue": ReadOnly<[f32; 3]>,
        torque_value = "TorqueValue": ReadOnly<[f32; 3]>,
        ref_coor_x = "RefCoorX": ReadOnly<f32>,
        ref_coor_y = "RefCoorY": ReadOnly<f32>,
        ref_coor_z = "RefCoorZ": ReadOnly<f32>,
        ref_coor_tx = "RefCoorTX": ReadOnly<f32>,
        ref_coor_ty = "RefCoorTY": ReadOnly<f32>,
        ref_coor_tz = "RefCoorTZ": ReadOnly<f32>,
        ref_coor_f3d = "RefCoorF3D": ReadOnly<f32>,
        ref_coor_t3d = "RefCoorT3D": ReadOnly<f32>,
        ref_coor_force_value = "RefCoorForceValue": ReadOnly<[f32; 3]>,
    }
}

/// Built-in tools whose attributes cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemTool {
    NoTool,
    HandCamera,
}

impl SystemTool {
    pub const ALL: [SystemTool; 2] = [SystemTool::NoTool, SystemTool::HandCamera];

    pub const fn name(self) -> &'static str {
        match self {
            SystemTool::NoTool => "NOTOOL",
            SystemTool::HandCamera => "HandCamera",
        }
    }
}

/// I/O modules with digital and analog channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoModule {
    ControlBox,
    EndModule,
}

impl IoModule {
    pub const fn name(self) -> &'static str {
        match self {
            IoModule::ControlBox => "ControlBox",
            IoModule::EndModule => "EndModule",
        }
    }
}

pub fn point(name: &str) -> PointAttributes {
    PointAttributes::with_prefix(&keyed("Point", name))
}

pub fn base(name: &str) -> BaseAttributes {
    BaseAttributes::with_prefix(&keyed("Base", name))
}

pub fn vpoint(name: &str) -> VPointAttributes {
    VPointAttributes::with_prefix(&keyed("VPoint", name))
}

pub fn ft(name: &str) -> FtAttributes {
    FtAttributes::with_prefix(&keyed("FT", name))
}

/// A user-defined tool. The system tool names are rejected; use
/// [`system_tcp`] for those.
pub fn tcp(name: &str) -> Result<ToolAttributes> {
    if SystemTool::ALL.iter().any(|tool| tool.name() == name) {
        return Err(ScriptError::ReservedToolName(name.to_string()));
    }
    Ok(ToolAttributes::with_prefix(&keyed("TCP", name)))
}

pub fn system_tcp(tool: SystemTool) -> SystemToolAttributes {
    SystemToolAttributes::with_prefix(&keyed("TCP", tool.name()))
}

pub fn io(module: IoModule) -> IoAttributes {
    IoAttributes::with_prefix(&keyed("IO", module.name()))
}

pub fn safety_io() -> SafetyIoAttributes {
    SafetyIoAttributes::with_prefix(&keyed("IO", "Safety"))
}

/// The robot arm. The controller exposes a single robot at index 0.
pub fn robot(index: i32) -> Result<RobotAttributes> {
    if index != 0 {
        return Err(ScriptError::InvalidIndex {
            item: "Robot",
            index,
            expected: 0,
        });
    }
    Ok(RobotAttributes::with_prefix("Robot[0]."))
}
