use std::env::current_dir;
use std::fs::create_dir_all;

use cosmwasm_schema::{export_schema, remove_schemas, schema_for};

use hodl::cdp::{
    Config, ExecuteMsg, InstantiateMsg, MigrateMsg, ModuleStateResponse, Params,
    PositionHealthResponse, PriceResponse, QueryMsg, SudoMsg,
};
use hodl::types::{CollateralType, Position};

fn main() {
    let mut out_dir = current_dir().unwrap();
    out_dir.push("schema");
    create_dir_all(&out_dir).unwrap();
    remove_schemas(&out_dir).unwrap();

    export_schema(&schema_for!(InstantiateMsg), &out_dir);
    export_schema(&schema_for!(ExecuteMsg), &out_dir);
    export_schema(&schema_for!(SudoMsg), &out_dir);
    export_schema(&schema_for!(QueryMsg), &out_dir);
    export_schema(&schema_for!(MigrateMsg), &out_dir);
    export_schema(&schema_for!(Config), &out_dir);
    export_schema(&schema_for!(Params), &out_dir);
    export_schema(&schema_for!(Position), &out_dir);
    export_schema(&schema_for!(CollateralType), &out_dir);
    export_schema(&schema_for!(PriceResponse), &out_dir);
    export_schema(&schema_for!(ModuleStateResponse), &out_dir);
    export_schema(&schema_for!(PositionHealthResponse), &out_dir);
}
