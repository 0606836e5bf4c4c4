// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod mercadopago;

pub use mercadopago::{
    BackUrls, MercadoPagoApi, MercadoPagoClient, PreferenceItem, PreferenceRequest,
    PreferenceResponse, TokenExchangeResponse,
};
