mod normalization;
mod scope;
