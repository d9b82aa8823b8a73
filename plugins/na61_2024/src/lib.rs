//! `libNA61_2024`: the NA61 π⁻ analysis as a plugin. The driver loads it
//! from its plugin search path when `prefer_plugins = true`.

#![allow(non_snake_case)]

use hadronic::analysis::Na61Pim2024;

hadronic::export_analysis!(Na61Pim2024::default());
