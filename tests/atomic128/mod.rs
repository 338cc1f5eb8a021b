/*******************************************************************************
 *
 *    Copyright (c) 2025.
 *    3-Prism Co. Ltd.
 *
 *    All rights reserved.
 *
 ******************************************************************************/


mod buffer_tests;
mod dynamic_tests;
mod fault_tests;
mod fixtures;
